use image::RgbImage;

use crate::{
    foundation::core::{BACKGROUND, Rgb8},
    stack::FrameStack,
};

pub type PremulRgba8 = [u8; 4];

/// Alpha stamped onto the previous frame for the onion-skin pass (~39%).
pub const ONION_ALPHA: u8 = 100;

const TRANSPARENT: PremulRgba8 = [0, 0, 0, 0];

/// Where the translucent previous frame goes relative to the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnionPlacement {
    /// Previous frame is composited first and the opaque current frame is
    /// drawn over it. Since frames have no transparency of their own, the
    /// visible result is the current frame unchanged.
    #[default]
    Beneath,
    /// Previous frame is composited over the current frame, leaving a
    /// visible ghost wherever the two differ.
    Above,
}

/// Displayable image for the current frame, onion skin in its default
/// placement. `None` when the stack is empty.
pub fn render(stack: &FrameStack, onion_skin: bool) -> Option<RgbImage> {
    render_with(stack, onion_skin.then_some(OnionPlacement::default()))
}

/// Like [`render`], with an explicit onion placement (`None` disables it).
pub fn render_with(stack: &FrameStack, onion: Option<OnionPlacement>) -> Option<RgbImage> {
    let base = stack.current()?;
    let (Some(placement), Some(prev)) = (onion, stack.previous_frame()) else {
        return Some(base.image().clone());
    };

    let mut out = RgbImage::new(base.width(), base.height());
    for ((dst, cur), old) in out
        .pixels_mut()
        .zip(base.image().pixels())
        .zip(prev.image().pixels())
    {
        let cur = opaque(Rgb8::from(*cur));
        let ghost = with_alpha(Rgb8::from(*old), ONION_ALPHA);
        let composed = match placement {
            OnionPlacement::Beneath => over(over(TRANSPARENT, ghost), cur),
            OnionPlacement::Above => over(cur, ghost),
        };
        *dst = flatten(composed, BACKGROUND).to_pixel();
    }
    Some(out)
}

pub fn opaque(c: Rgb8) -> PremulRgba8 {
    [c.r, c.g, c.b, 255]
}

/// Straight color with the given alpha, premultiplied.
pub fn with_alpha(c: Rgb8, a: u8) -> PremulRgba8 {
    let a16 = u16::from(a);
    [
        mul_div255(u16::from(c.r), a16),
        mul_div255(u16::from(c.g), a16),
        mul_div255(u16::from(c.b), a16),
        a,
    ]
}

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);
    [
        src[0].saturating_add(mul_div255(u16::from(dst[0]), inv)),
        src[1].saturating_add(mul_div255(u16::from(dst[1]), inv)),
        src[2].saturating_add(mul_div255(u16::from(dst[2]), inv)),
        sa.saturating_add(mul_div255(u16::from(dst[3]), inv)),
    ]
}

/// Drop alpha by compositing over an opaque background color.
pub fn flatten(px: PremulRgba8, bg: Rgb8) -> Rgb8 {
    let inv = 255u16 - u16::from(px[3]);
    Rgb8::new(
        px[0].saturating_add(mul_div255(u16::from(bg.r), inv)),
        px[1].saturating_add(mul_div255(u16::from(bg.g), inv)),
        px[2].saturating_add(mul_div255(u16::from(bg.b), inv)),
    )
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
