use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};

use anyhow::Context as _;
use image::{
    Delay, DynamicImage, Frame,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    codec::ensure_parent_dir,
    foundation::error::{FlipbookError, FlipbookResult},
    stack::FrameStack,
};

pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    pub frame_delay: Duration,
    pub repeat_forever: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            frame_delay: DEFAULT_FRAME_DELAY,
            repeat_forever: true,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.frame_delay.is_zero() {
            return Err(FlipbookError::validation("export frame delay must be > 0"));
        }
        if self.frame_delay.as_millis() > u128::from(u32::MAX) {
            return Err(FlipbookError::validation(
                "export frame delay does not fit in milliseconds",
            ));
        }
        Ok(())
    }

    fn delay(&self) -> Delay {
        Delay::from_saturating_duration(self.frame_delay)
    }
}

/// Write `stack` to `path` as a looping GIF (100 ms per frame).
///
/// An empty stack is a no-op: nothing is written and `Ok(false)` is returned.
pub fn export_animation(stack: &FrameStack, path: &Path) -> FlipbookResult<bool> {
    export_animation_with(stack, path, &ExportConfig::default())
}

#[tracing::instrument(skip(stack, path, cfg), fields(frames = stack.len(), path = %path.display()))]
pub fn export_animation_with(
    stack: &FrameStack,
    path: &Path,
    cfg: &ExportConfig,
) -> FlipbookResult<bool> {
    cfg.validate()?;
    if stack.is_empty() {
        tracing::debug!("nothing to export: frame stack is empty");
        return Ok(false);
    }

    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    export_animation_to_writer(stack, &mut w, cfg)?;
    w.flush()
        .with_context(|| format!("flush '{}'", path.display()))?;

    tracing::info!("exported animation");
    Ok(true)
}

/// Encode `stack` as GIF into any writer. Returns `Ok(false)` for an empty
/// stack without writing anything.
pub fn export_animation_to_writer<W: Write>(
    stack: &FrameStack,
    writer: W,
    cfg: &ExportConfig,
) -> FlipbookResult<bool> {
    cfg.validate()?;
    if stack.is_empty() {
        return Ok(false);
    }

    let mut encoder = GifEncoder::new(writer);
    if cfg.repeat_forever {
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| FlipbookError::encode(format!("gif repeat: {e}")))?;
    }

    let delay = cfg.delay();
    let frames = stack.iter().map(|f| {
        let rgba = DynamicImage::ImageRgb8(f.image().clone()).into_rgba8();
        Frame::from_parts(rgba, 0, 0, delay)
    });
    encoder
        .encode_frames(frames)
        .map_err(|e| FlipbookError::encode(format!("gif frames: {e}")))?;

    Ok(true)
}
