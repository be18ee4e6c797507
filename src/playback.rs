use std::time::{Duration, Instant};

use crate::{export::DEFAULT_FRAME_DELAY, stack::FrameStack};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    /// Showing `index`; the next frame is due at `next_at`.
    Playing { index: usize, next_at: Instant },
}

/// What a [`Playback::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStep {
    /// Not playing.
    Idle,
    /// Still showing the same frame.
    Waiting,
    /// Moved on to this frame; the caller should re-render.
    Advanced(usize),
    /// Ran past the last frame and went back to idle.
    Finished,
}

/// One-shot preview of the stack, driven cooperatively by the UI loop.
///
/// Playback runs from the first frame to the last once, moving the stack's
/// cursor as it goes, and can be cancelled at any point.
#[derive(Clone, Debug)]
pub struct Playback {
    state: PlaybackState,
    frame_delay: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_DELAY)
    }
}

impl Playback {
    pub fn new(frame_delay: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            frame_delay,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Select frame 0 and start playing. Returns `false` on an empty stack.
    pub fn start(&mut self, stack: &mut FrameStack, now: Instant) -> bool {
        if !stack.select(0) {
            self.state = PlaybackState::Idle;
            return false;
        }
        tracing::debug!(frames = stack.len(), "playback started");
        self.state = PlaybackState::Playing {
            index: 0,
            next_at: now + self.frame_delay,
        };
        true
    }

    pub fn cancel(&mut self) {
        if self.is_playing() {
            tracing::debug!("playback cancelled");
        }
        self.state = PlaybackState::Idle;
    }

    /// Advance at most one frame if its delay has elapsed.
    ///
    /// The stack length is read on every tick, so frames deleted mid-play
    /// end playback early instead of indexing past the end.
    pub fn tick(&mut self, stack: &mut FrameStack, now: Instant) -> PlaybackStep {
        let PlaybackState::Playing { index, next_at } = self.state else {
            return PlaybackStep::Idle;
        };
        if now < next_at {
            return PlaybackStep::Waiting;
        }

        let next = index + 1;
        if !stack.select(next) {
            tracing::debug!("playback finished");
            self.state = PlaybackState::Idle;
            return PlaybackStep::Finished;
        }
        self.state = PlaybackState::Playing {
            index: next,
            next_at: now + self.frame_delay,
        };
        PlaybackStep::Advanced(next)
    }
}
