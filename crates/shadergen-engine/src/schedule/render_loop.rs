use crate::time::{FrameClock, FrameTime};

use super::{FrameRequester, FrameToken};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Idle,
    Running,
    /// Terminal; a new source gets a new loop.
    Stopped,
}

/// What happened to a frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was rendered with this elapsed time.
    Drawn { elapsed: f32 },
    /// Stale or cancelled callback; nothing was touched.
    Skipped,
}

/// Per-session frame scheduler: `Idle → Running → Stopped`.
///
/// Holds at most one outstanding [`FrameToken`]. Exactly one frame is in
/// flight at a time, so frame N is fully issued before N+1 is requested.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    pending: Option<FrameToken>,
    clock: FrameClock,
    frames_drawn: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            pending: None,
            clock: FrameClock::new(),
            frames_drawn: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// `Idle → Running`: restarts the clock and requests the first frame.
    ///
    /// Returns `false` (and does nothing) from any other state.
    pub fn start<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        self.state = LoopState::Running;
        self.clock.reset();
        self.pending = Some(requester.request_frame());
        true
    }

    /// Entry guard of the frame callback.
    ///
    /// Accepts `token` only while running and only if it is the outstanding
    /// one; the token is consumed and the clock advanced. Anything else is a
    /// callback that raced with teardown and is expected.
    pub fn begin_frame(&mut self, token: FrameToken) -> Option<FrameTime> {
        if self.state != LoopState::Running || self.pending != Some(token) {
            log::debug!(
                "skipped frame {} (loop {:?}, pending {:?}); expected during teardown",
                token.id(),
                self.state,
                self.pending.map(FrameToken::id),
            );
            return None;
        }
        self.pending = None;
        let time = self.clock.tick();
        log::trace!("frame {} dt {:.4}s", time.frame_index, time.dt);
        Some(time)
    }

    /// Re-arms the loop after a frame was issued.
    pub fn finish_frame<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) {
        if self.state != LoopState::Running {
            return;
        }
        self.frames_drawn += 1;
        debug_assert!(self.pending.is_none(), "frame finished with a callback still pending");
        self.pending = Some(requester.request_frame());
    }

    /// `* → Stopped`: cancels the outstanding callback before returning.
    ///
    /// Idempotent.
    pub fn stop<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) {
        if let Some(token) = self.pending.take() {
            requester.cancel_frame(token);
        }
        if self.state != LoopState::Stopped {
            log::debug!("render loop stopped after {} frames", self.frames_drawn);
        }
        self.state = LoopState::Stopped;
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualFrameRequester;

    #[test]
    fn start_requests_first_frame() {
        let mut req = ManualFrameRequester::new();
        let mut rl = RenderLoop::new();
        assert_eq!(rl.state(), LoopState::Idle);

        assert!(rl.start(&mut req));
        assert_eq!(rl.state(), LoopState::Running);
        assert_eq!(rl.pending(), req.outstanding());
        assert!(!rl.start(&mut req));
    }

    #[test]
    fn frames_are_sequential_and_time_increases() {
        let mut req = ManualFrameRequester::new();
        let mut rl = RenderLoop::new();
        rl.start(&mut req);

        let mut last = -1.0f32;
        for _ in 0..5 {
            let token = req.next_due().unwrap();
            let ft = rl.begin_frame(token).unwrap();
            assert!(ft.elapsed > last);
            last = ft.elapsed;
            rl.finish_frame(&mut req);
        }
        assert_eq!(rl.frames_drawn(), 5);
    }

    #[test]
    fn stale_token_is_skipped() {
        let mut req = ManualFrameRequester::new();
        let mut rl = RenderLoop::new();
        rl.start(&mut req);
        let first = rl.pending().unwrap();

        assert!(rl.begin_frame(FrameToken::new(first.id() + 100)).is_none());
        assert!(rl.begin_frame(first).is_some());
        // Consumed: a duplicate delivery is skipped.
        assert!(rl.begin_frame(first).is_none());
    }

    #[test]
    fn stop_cancels_pending_and_blocks_callbacks() {
        let mut req = ManualFrameRequester::new();
        let mut rl = RenderLoop::new();
        rl.start(&mut req);
        let token = rl.pending().unwrap();

        rl.stop(&mut req);
        assert_eq!(rl.state(), LoopState::Stopped);
        assert!(req.outstanding().is_none());
        assert!(rl.begin_frame(token).is_none());

        rl.stop(&mut req);
        assert_eq!(req.cancelled(), vec![token]);
        assert!(!rl.start(&mut req));
    }
}
