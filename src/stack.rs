use crate::{foundation::core::Canvas, frame::RasterFrame};

/// Ordered frames of an animation plus the cursor of the frame being edited.
///
/// `current` is `Some(i)` with `i < frames.len()` whenever the stack is
/// non-empty, and `None` only when it is empty. Navigation past either end is
/// ignored rather than wrapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameStack {
    canvas: Canvas,
    frames: Vec<RasterFrame>,
    current: Option<usize>,
}

impl FrameStack {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frames: Vec::new(),
            current: None,
        }
    }

    /// Build a stack from already-decoded frames, selecting the first one.
    ///
    /// Every frame must match `canvas`; callers decode against the same
    /// canvas so this is only checked in debug builds.
    pub fn from_frames(canvas: Canvas, frames: Vec<RasterFrame>) -> Self {
        debug_assert!(frames.iter().all(|f| f.canvas() == canvas));
        let current = if frames.is_empty() { None } else { Some(0) };
        Self {
            canvas,
            frames,
            current,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&RasterFrame> {
        self.current.and_then(|i| self.frames.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut RasterFrame> {
        self.current.and_then(|i| self.frames.get_mut(i))
    }

    /// The frame just before the current one, used for onion skinning.
    pub fn previous_frame(&self) -> Option<&RasterFrame> {
        match self.current {
            Some(i) if i > 0 => self.frames.get(i - 1),
            _ => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&RasterFrame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RasterFrame> {
        self.frames.iter()
    }

    /// Append a blank frame and select it.
    pub fn create_frame(&mut self) -> usize {
        self.frames.push(RasterFrame::blank(self.canvas));
        let index = self.frames.len() - 1;
        self.current = Some(index);
        index
    }

    /// Remove the selected frame. The cursor moves back one step unless it
    /// was already on the first frame. No-op on an empty stack.
    pub fn delete_current(&mut self) -> Option<RasterFrame> {
        let index = self.current?;
        let removed = self.frames.remove(index);
        self.current = if self.frames.is_empty() {
            None
        } else {
            Some(index.saturating_sub(1))
        };
        Some(removed)
    }

    /// Move the cursor to `index` if it is in range; otherwise do nothing.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.frames.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        match self.current {
            Some(i) => self.select(i + 1),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => self.select(i - 1),
            _ => false,
        }
    }

    /// Swap in a fully decoded stack, returning the one it replaced.
    pub fn replace(&mut self, other: FrameStack) -> FrameStack {
        std::mem::replace(self, other)
    }
}

impl<'a> IntoIterator for &'a FrameStack {
    type Item = &'a RasterFrame;
    type IntoIter = std::slice::Iter<'a, RasterFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
