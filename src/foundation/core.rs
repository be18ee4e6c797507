use crate::foundation::error::{FlipbookError, FlipbookResult};

pub use kurbo::{Line, Point, Vec2};

/// Bytes per pixel in a raw frame dump (row-major RGB8, no padding).
pub const BYTES_PER_PIXEL: usize = 3;

/// Pixel dimensions shared by every frame of a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;

    pub fn new(width: u32, height: u32) -> FlipbookResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> FlipbookResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlipbookError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(())
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of one frame's raw RGB buffer.
    pub fn raw_len(self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }

    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Straight (opaque) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    /// `0x00RRGGBB`, the layout window framebuffers expect.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl From<image::Rgb<u8>> for Rgb8 {
    fn from(px: image::Rgb<u8>) -> Self {
        Self::new(px.0[0], px.0[1], px.0[2])
    }
}

/// Color every new frame is filled with; the eraser paints it back.
pub const BACKGROUND: Rgb8 = Rgb8::WHITE;
/// Ink color for draw-mode strokes.
pub const FOREGROUND: Rgb8 = Rgb8::BLACK;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(1, 1).is_ok());
    }

    #[test]
    fn default_canvas_raw_len() {
        let c = Canvas::default();
        assert_eq!((c.width, c.height), (800, 600));
        assert_eq!(c.raw_len(), 800 * 600 * 3);
    }

    #[test]
    fn canvas_contains_boundaries() {
        let c = Canvas::new(4, 3).unwrap();
        assert!(c.contains(0, 0));
        assert!(c.contains(3, 2));
        assert!(!c.contains(4, 0));
        assert!(!c.contains(0, 3));
        assert!(!c.contains(-1, 0));
    }

    #[test]
    fn rgb_to_u32_packs_channels() {
        assert_eq!(Rgb8::new(0x12, 0x34, 0x56).to_u32(), 0x0012_3456);
        assert_eq!(Rgb8::WHITE.to_u32(), 0x00FF_FFFF);
    }
}
