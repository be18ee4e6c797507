use std::{path::Path, time::Instant};

use image::RgbImage;

use crate::{
    codec,
    composite::{self, OnionPlacement},
    config::AnimatorConfig,
    export::{self, ExportConfig},
    foundation::{core::Point, error::FlipbookResult},
    paint::{PaintEngine, ToolState},
    playback::{Playback, PlaybackStep},
    stack::FrameStack,
};

/// Everything a UI needs to drive the editor: the frame stack, brush/view
/// toggles, the in-progress stroke and playback.
///
/// Each method maps to one user action. Methods that change what is on
/// screen return `true` when the caller should re-render.
#[derive(Clone, Debug)]
pub struct Session {
    config: AnimatorConfig,
    stack: FrameStack,
    tools: ToolState,
    last_point: Option<Point>,
    playback: Playback,
}

impl Session {
    /// A session holding one blank frame.
    pub fn new(config: AnimatorConfig) -> Self {
        let mut stack = FrameStack::new(config.canvas);
        stack.create_frame();
        Self::with_stack(config, stack)
    }

    /// A session around an existing stack (e.g. one loaded from disk).
    pub fn with_stack(config: AnimatorConfig, stack: FrameStack) -> Self {
        Self {
            tools: config.tool_state(),
            playback: Playback::new(config.frame_delay()),
            stack,
            last_point: None,
            config,
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn stack(&self) -> &FrameStack {
        &self.stack
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    // Frames

    pub fn new_frame(&mut self) -> bool {
        self.last_point = None;
        self.stack.create_frame();
        true
    }

    pub fn delete_frame(&mut self) -> bool {
        self.last_point = None;
        self.stack.delete_current().is_some()
    }

    pub fn select_frame(&mut self, index: usize) -> bool {
        self.stack.select(index)
    }

    pub fn next_frame(&mut self) -> bool {
        self.stack.next()
    }

    pub fn prev_frame(&mut self) -> bool {
        self.stack.previous()
    }

    // Strokes

    pub fn begin_stroke(&mut self, at: Point) {
        self.last_point = Some(at);
    }

    /// Paint from the previous pointer sample to `to`. Ignored outside a
    /// stroke or with no frame to paint on.
    pub fn drag_to(&mut self, to: Point) -> bool {
        let Some(from) = self.last_point else {
            return false;
        };
        let painted = PaintEngine::stroke_segment(
            &mut self.stack,
            from,
            to,
            self.tools.brush_size,
            self.tools.erase_mode,
        );
        self.last_point = Some(to);
        painted
    }

    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    pub fn is_stroking(&self) -> bool {
        self.last_point.is_some()
    }

    // Tools

    pub fn set_draw_mode(&mut self) -> bool {
        self.tools.erase_mode = false;
        true
    }

    /// Switch to the eraser. Like the draw-mode button, this sets rather than
    /// toggles.
    pub fn set_erase_mode(&mut self) -> bool {
        self.tools.erase_mode = true;
        true
    }

    pub fn increase_brush(&mut self) -> u32 {
        self.tools.increase_brush()
    }

    pub fn decrease_brush(&mut self) -> u32 {
        self.tools.decrease_brush()
    }

    pub fn toggle_onion_skin(&mut self) -> bool {
        self.tools.onion_skin = !self.tools.onion_skin;
        self.tools.onion_skin
    }

    pub fn set_onion_placement(&mut self, placement: OnionPlacement) {
        self.tools.onion_placement = placement;
    }

    // Display

    /// Composited image of the current frame, or `None` for an empty stack.
    pub fn render(&self) -> Option<RgbImage> {
        let onion = self
            .tools
            .onion_skin
            .then_some(self.tools.onion_placement);
        composite::render_with(&self.stack, onion)
    }

    pub fn status_line(&self) -> String {
        let mode = if self.tools.erase_mode { "Erase" } else { "Draw" };
        let frame = match self.stack.current_index() {
            Some(i) => format!("{}/{}", i + 1, self.stack.len()),
            None => "-/0".to_string(),
        };
        let onion = if self.tools.onion_skin { "on" } else { "off" };
        format!(
            "Mode: {mode}  |  Frame: {frame}  |  Size: {}  |  Onion: {onion}",
            self.tools.brush_size
        )
    }

    // Playback

    pub fn start_playback(&mut self, now: Instant) -> bool {
        self.last_point = None;
        self.playback.start(&mut self.stack, now)
    }

    pub fn cancel_playback(&mut self) {
        self.playback.cancel();
    }

    pub fn tick(&mut self, now: Instant) -> PlaybackStep {
        self.playback.tick(&mut self.stack, now)
    }

    // Files
    //
    // `None` means the user picked no path (a cancelled dialog, or no file
    // configured); the action is skipped without touching any state.

    pub fn save(&self, path: Option<&Path>) -> FlipbookResult<bool> {
        let Some(path) = path else {
            tracing::debug!("save skipped: no path");
            return Ok(false);
        };
        codec::save_file(&self.stack, path)?;
        Ok(true)
    }

    /// Replace the stack with the file's contents. On any error the current
    /// stack is left exactly as it was.
    pub fn load(&mut self, path: Option<&Path>) -> FlipbookResult<bool> {
        let Some(path) = path else {
            tracing::debug!("load skipped: no path");
            return Ok(false);
        };
        let loaded = codec::load_file(path, self.config.canvas)?;
        self.replace_stack(loaded);
        Ok(true)
    }

    /// Decode a document held in memory; same all-or-nothing rule as
    /// [`Session::load`].
    pub fn load_bytes(&mut self, bytes: &[u8]) -> FlipbookResult<()> {
        let loaded = codec::load(bytes, self.config.canvas)?;
        self.replace_stack(loaded);
        Ok(())
    }

    pub fn export(&self, path: Option<&Path>) -> FlipbookResult<bool> {
        let Some(path) = path else {
            tracing::debug!("export skipped: no path");
            return Ok(false);
        };
        export::export_animation_with(&self.stack, path, &self.export_config())
    }

    pub fn export_config(&self) -> ExportConfig {
        self.config.export_config()
    }

    fn replace_stack(&mut self, loaded: FrameStack) {
        self.playback.cancel();
        self.last_point = None;
        self.stack.replace(loaded);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::foundation::core::{BACKGROUND, Canvas, FOREGROUND};

    fn session() -> Session {
        Session::new(AnimatorConfig {
            canvas: Canvas::new(40, 30).unwrap(),
            ..AnimatorConfig::default()
        })
    }

    #[test]
    fn starts_with_one_blank_frame() {
        let s = session();
        assert_eq!(s.stack().len(), 1);
        assert_eq!(s.stack().current_index(), Some(0));
        assert_eq!(
            s.status_line(),
            "Mode: Draw  |  Frame: 1/1  |  Size: 5  |  Onion: on"
        );
    }

    #[test]
    fn with_stack_keeps_the_given_stack() {
        let cfg = AnimatorConfig {
            canvas: Canvas::new(8, 6).unwrap(),
            initial_brush_size: 9,
            ..AnimatorConfig::default()
        };
        let s = Session::with_stack(cfg.clone(), FrameStack::new(cfg.canvas));
        assert!(s.stack().is_empty());
        assert_eq!(s.stack().canvas(), cfg.canvas);
        assert_eq!(s.tools().brush_size, 9);
        assert!(!s.playback().is_playing());
        assert!(s.status_line().contains("Frame: -/0"));
    }

    #[test]
    fn drag_paints_consecutive_segments() {
        let mut s = session();
        assert!(!s.drag_to(Point::new(5.0, 5.0)));

        s.begin_stroke(Point::new(5.0, 5.0));
        assert!(s.drag_to(Point::new(15.0, 5.0)));
        assert!(s.drag_to(Point::new(15.0, 20.0)));
        s.end_stroke();

        let f = s.stack().current().unwrap();
        assert_eq!(f.pixel(10, 5), Some(FOREGROUND));
        assert_eq!(f.pixel(15, 12), Some(FOREGROUND));
        assert_eq!(f.pixel(5, 20), Some(BACKGROUND));
        assert!(!s.drag_to(Point::new(30.0, 25.0)));
    }

    #[test]
    fn eraser_paints_background() {
        let mut s = session();
        s.begin_stroke(Point::new(5.0, 10.0));
        s.drag_to(Point::new(30.0, 10.0));
        s.set_erase_mode();
        s.begin_stroke(Point::new(5.0, 10.0));
        s.drag_to(Point::new(30.0, 10.0));
        assert!(s.stack().current().unwrap().as_raw().iter().all(|&b| b == 255));
        assert!(s.status_line().starts_with("Mode: Erase"));
    }

    #[test]
    fn deleting_everything_leaves_an_empty_canvas() {
        let mut s = session();
        assert!(s.delete_frame());
        assert!(!s.delete_frame());
        assert!(s.render().is_none());
        assert!(!s.next_frame());
        s.begin_stroke(Point::new(1.0, 1.0));
        assert!(!s.drag_to(Point::new(2.0, 2.0)));
        assert!(s.status_line().contains("Frame: -/0"));
    }

    #[test]
    fn cancelled_file_actions_are_no_ops() {
        let mut s = session();
        s.new_frame();
        let before = s.stack().clone();
        assert!(!s.save(None).unwrap());
        assert!(!s.load(None).unwrap());
        assert!(!s.export(None).unwrap());
        assert_eq!(s.stack(), &before);
    }

    #[test]
    fn failed_load_keeps_previous_stack() {
        let mut s = session();
        s.new_frame();
        s.begin_stroke(Point::new(1.0, 1.0));
        s.drag_to(Point::new(20.0, 1.0));
        let before = s.stack().clone();

        assert!(s.load_bytes(br#"{"frames":["AAAA"]}"#).is_err());
        assert!(s.load_bytes(b"{}").is_err());
        assert_eq!(s.stack(), &before);
    }

    #[test]
    fn playback_through_session() {
        let mut s = session();
        s.new_frame();
        s.new_frame();
        let t0 = Instant::now();
        assert!(s.start_playback(t0));
        assert_eq!(s.stack().current_index(), Some(0));
        assert_eq!(
            s.tick(t0 + Duration::from_millis(100)),
            PlaybackStep::Advanced(1)
        );
        s.cancel_playback();
        assert!(!s.playback().is_playing());
    }
}
