use std::collections::VecDeque;

use crate::backend::recording::{Call, Journal};

use super::{FrameRequester, FrameToken};

/// Hand-cranked [`FrameRequester`] for tests.
///
/// Requested tokens queue up until the test pops them with
/// [`next_due`](Self::next_due) and feeds them back as frame callbacks.
#[derive(Debug, Default)]
pub struct ManualFrameRequester {
    next_id: u64,
    queue: VecDeque<FrameToken>,
    cancelled: Vec<FrameToken>,
    journal: Option<Journal>,
}

impl ManualFrameRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also logs requests and cancellations into `journal`.
    pub fn with_journal(journal: Journal) -> Self {
        Self { journal: Some(journal), ..Self::default() }
    }

    /// Pops the oldest scheduled callback.
    pub fn next_due(&mut self) -> Option<FrameToken> {
        self.queue.pop_front()
    }

    /// Oldest scheduled callback, left in place.
    pub fn outstanding(&self) -> Option<FrameToken> {
        self.queue.front().copied()
    }

    pub fn cancelled(&self) -> Vec<FrameToken> {
        self.cancelled.clone()
    }
}

impl FrameRequester for ManualFrameRequester {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken::new(self.next_id);
        self.queue.push_back(token);
        if let Some(j) = &self.journal {
            j.push(Call::FrameRequested(token));
        }
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.queue.len();
        self.queue.retain(|t| *t != token);
        if self.queue.len() != before {
            self.cancelled.push(token);
            if let Some(j) = &self.journal {
                j.push(Call::FrameCancelled(token));
            }
        }
    }
}
