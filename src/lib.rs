//! Flipbook is a small frame-by-frame raster animation editor.
//!
//! A drawing is a [`FrameStack`]: equally sized RGB8 frames plus a cursor on
//! the frame being edited. The editing model is UI-agnostic:
//!
//! 1. **Paint**: [`PaintEngine::stroke_segment`] stamps one straight segment
//!    (black ink or white eraser) into the current frame.
//! 2. **Composite**: [`render`] produces the displayable image for the cursor,
//!    with an optional onion-skin pass for the previous frame.
//! 3. **Persist**: [`codec`] dumps every frame as base64 raw RGB inside a JSON
//!    document, and reloads it all-or-nothing.
//! 4. **Export**: [`export_animation`] writes a looping GIF at 100 ms per frame.
//!
//! [`Session`] bundles the stack with brush/view toggles, the in-progress
//! stroke and [`Playback`], exposing one method per user action. The optional
//! `window` feature adds a desktop shell on top of it.
#![forbid(unsafe_code)]

pub mod codec;
pub mod composite;
pub mod config;
pub mod export;
mod foundation;
pub mod frame;
pub mod paint;
pub mod playback;
pub mod session;
#[cfg(feature = "window")]
pub mod shell;
pub mod stack;

pub use codec::{load, load_file, load_from_reader, save, save_file, save_to_writer};
pub use composite::{ONION_ALPHA, OnionPlacement, render, render_with};
pub use config::AnimatorConfig;
pub use export::{
    DEFAULT_FRAME_DELAY, ExportConfig, export_animation, export_animation_to_writer,
    export_animation_with,
};
pub use foundation::core::{
    BACKGROUND, BYTES_PER_PIXEL, Canvas, FOREGROUND, Line, Point, Rgb8, Vec2,
};
pub use foundation::error::{FlipbookError, FlipbookResult};
pub use frame::RasterFrame;
pub use paint::{BRUSH_STEP, DEFAULT_BRUSH_SIZE, MIN_BRUSH_SIZE, PaintEngine, ToolState};
pub use playback::{Playback, PlaybackState, PlaybackStep};
pub use session::Session;
pub use stack::FrameStack;
