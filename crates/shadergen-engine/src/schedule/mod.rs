//! Render loop scheduling.
//!
//! The "wait for next display refresh" yield point is abstracted as a
//! [`FrameRequester`]: the loop asks for one frame at a time and receives a
//! token; it can cancel the outstanding token synchronously. A frame callback
//! carrying any other token is stale and is dropped by the loop's guard.

mod render_loop;
#[cfg(any(test, feature = "test-helpers"))]
mod manual;

pub use render_loop::{FrameOutcome, LoopState, RenderLoop};
#[cfg(any(test, feature = "test-helpers"))]
pub use manual::ManualFrameRequester;

/// Identifies one requested frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Source of "next display refresh" callbacks.
pub trait FrameRequester {
    /// Schedules one frame callback and returns its token.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraws a scheduled callback. Cancelling an already delivered or
    /// unknown token is a no-op.
    fn cancel_frame(&mut self, token: FrameToken);
}
