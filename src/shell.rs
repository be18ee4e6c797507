//! Desktop window for the editor (`window` feature).
//!
//! Mouse-left drag paints. Keys: `N` new frame, `Delete`/`X` delete frame,
//! `Left`/`Right` navigate, `D` draw, `E` eraser, `=`/`-` brush size,
//! `O` onion skin, `P` play, `Esc` stop playback or quit, `Ctrl+S` save,
//! `Ctrl+O` load, `G` export GIF. The status line lives in the title bar.

use std::{path::PathBuf, time::Instant};

use anyhow::anyhow;
use image::RgbImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::{
    foundation::{
        core::{BACKGROUND, Point, Rgb8},
        error::{FlipbookError, FlipbookResult},
    },
    playback::PlaybackStep,
    session::Session,
};

/// Files the window's save/load/export keys act on. A missing path turns the
/// matching key into a no-op.
#[derive(Clone, Debug, Default)]
pub struct ShellPaths {
    pub document: Option<PathBuf>,
    pub gif: Option<PathBuf>,
}

struct Shell {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    notice: Option<String>,
}

/// Open the editor window and run until it is closed.
pub fn run(mut session: Session, paths: ShellPaths) -> FlipbookResult<()> {
    let canvas = session.config().canvas;
    let (width, height) = (canvas.width as usize, canvas.height as usize);
    let mut window = Window::new("Flipbook", width, height, WindowOptions::default())
        .map_err(|e| FlipbookError::Other(anyhow!("open window: {e}")))?;
    window.set_target_fps(60);

    let mut shell = Shell {
        window,
        buffer: vec![BACKGROUND.to_u32(); canvas.pixel_count()],
        width,
        height,
        notice: None,
    };

    let mut dirty = true;
    while shell.window.is_open() {
        if shell.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            if session.playback().is_playing() {
                session.cancel_playback();
            } else {
                break;
            }
        }

        if matches!(
            session.tick(Instant::now()),
            PlaybackStep::Advanced(_) | PlaybackStep::Finished
        ) {
            dirty = true;
        }

        dirty |= shell.handle_keys(&mut session, &paths);
        dirty |= shell.handle_mouse(&mut session);

        if dirty {
            shell.refresh(&session);
            dirty = false;
        }
        shell
            .window
            .update_with_buffer(&shell.buffer, shell.width, shell.height)
            .map_err(|e| FlipbookError::Other(anyhow!("update window: {e}")))?;
    }
    Ok(())
}

impl Shell {
    fn pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    fn ctrl_down(&self) -> bool {
        self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl)
    }

    fn handle_keys(&mut self, session: &mut Session, paths: &ShellPaths) -> bool {
        let mut changed = false;

        if self.ctrl_down() {
            if self.pressed(Key::S) {
                let result = session.save(paths.document.as_deref());
                self.report("saved", result);
                changed = true;
            }
            if self.pressed(Key::O) {
                let result = session.load(paths.document.as_deref());
                self.report("loaded", result);
                changed = true;
            }
            return changed;
        }

        if self.pressed(Key::N) {
            changed |= session.new_frame();
        }
        if self.pressed(Key::Delete) || self.pressed(Key::X) {
            changed |= session.delete_frame();
        }
        if self.pressed(Key::Left) {
            changed |= session.prev_frame();
        }
        if self.pressed(Key::Right) {
            changed |= session.next_frame();
        }
        if self.pressed(Key::D) {
            changed |= session.set_draw_mode();
        }
        if self.pressed(Key::E) {
            changed |= session.set_erase_mode();
        }
        if self.pressed(Key::Equal) || self.pressed(Key::NumPadPlus) {
            session.increase_brush();
            changed = true;
        }
        if self.pressed(Key::Minus) || self.pressed(Key::NumPadMinus) {
            session.decrease_brush();
            changed = true;
        }
        if self.pressed(Key::O) {
            session.toggle_onion_skin();
            changed = true;
        }
        if self.pressed(Key::P) {
            changed |= session.start_playback(Instant::now());
        }
        if self.pressed(Key::G) {
            let result = session.export(paths.gif.as_deref());
            self.report("exported", result);
            changed = true;
        }
        changed
    }

    fn handle_mouse(&mut self, session: &mut Session) -> bool {
        if !self.window.get_mouse_down(MouseButton::Left) {
            session.end_stroke();
            return false;
        }
        let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Clamp) else {
            return false;
        };
        let at = Point::new(f64::from(x.round()), f64::from(y.round()));
        if session.is_stroking() {
            session.drag_to(at)
        } else {
            session.begin_stroke(at);
            false
        }
    }

    fn report(&mut self, done: &str, result: FlipbookResult<bool>) {
        self.notice = match result {
            Ok(true) => Some(done.to_string()),
            Ok(false) => None,
            Err(e) => {
                tracing::error!(error = %e, "file action failed");
                Some(format!("error: {e}"))
            }
        };
    }

    fn refresh(&mut self, session: &Session) {
        blit(session.render().as_ref(), &mut self.buffer);
        let mut title = session.status_line();
        if let Some(notice) = &self.notice {
            title.push_str("  |  ");
            title.push_str(notice);
        }
        self.window.set_title(&title);
    }
}

/// Copy an RGB image into a `0x00RRGGBB` framebuffer; `None` clears it.
fn blit(img: Option<&RgbImage>, buffer: &mut [u32]) {
    match img {
        Some(img) => {
            for (dst, px) in buffer.iter_mut().zip(img.pixels()) {
                *dst = Rgb8::from(*px).to_u32();
            }
        }
        None => buffer.fill(BACKGROUND.to_u32()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_packs_pixels_and_clears() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgb([1, 2, 3]));
        let mut buf = vec![7u32; 2];
        blit(Some(&img), &mut buf);
        assert_eq!(buf, vec![0, 0x0001_0203]);
        blit(None, &mut buf);
        assert_eq!(buf, vec![0x00FF_FFFF; 2]);
    }
}
