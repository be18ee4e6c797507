use crate::{
    composite::OnionPlacement,
    foundation::core::{BACKGROUND, FOREGROUND, Point, Rgb8},
    stack::FrameStack,
};

pub const MIN_BRUSH_SIZE: u32 = 2;
pub const BRUSH_STEP: u32 = 2;
pub const DEFAULT_BRUSH_SIZE: u32 = 5;

/// Brush and view toggles driven by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolState {
    pub brush_size: u32,
    pub erase_mode: bool,
    pub onion_skin: bool,
    pub onion_placement: OnionPlacement,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            brush_size: DEFAULT_BRUSH_SIZE,
            erase_mode: false,
            onion_skin: true,
            onion_placement: OnionPlacement::default(),
        }
    }
}

impl ToolState {
    pub fn increase_brush(&mut self) -> u32 {
        self.brush_size = self.brush_size.saturating_add(BRUSH_STEP);
        self.brush_size
    }

    /// Shrink by one step, never below [`MIN_BRUSH_SIZE`].
    pub fn decrease_brush(&mut self) -> u32 {
        if self.brush_size > MIN_BRUSH_SIZE {
            self.brush_size = self.brush_size.saturating_sub(BRUSH_STEP).max(MIN_BRUSH_SIZE);
        }
        self.brush_size
    }

    pub fn stroke_color(&self) -> Rgb8 {
        stroke_color(self.erase_mode)
    }
}

pub fn stroke_color(erase_mode: bool) -> Rgb8 {
    if erase_mode { BACKGROUND } else { FOREGROUND }
}

/// Applies stroke segments to the current frame of a stack.
///
/// Holds no state between calls: a freehand stroke is the caller issuing one
/// segment per consecutive pair of pointer samples.
pub struct PaintEngine;

impl PaintEngine {
    /// Paint `from -> to` on the selected frame. Returns `false` (and does
    /// nothing) when the stack is empty.
    pub fn stroke_segment(
        stack: &mut FrameStack,
        from: Point,
        to: Point,
        brush_size: u32,
        erase_mode: bool,
    ) -> bool {
        let Some(frame) = stack.current_mut() else {
            tracing::trace!("stroke segment ignored: no current frame");
            return false;
        };
        frame.draw_line(from, to, brush_size, stroke_color(erase_mode));
        true
    }
}
