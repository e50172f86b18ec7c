//! Deferred disconnection.
//!
//! A disconnect requested while an answer awaits its score waits for the
//! correlation to clear. The correlator's grace period bounds the wait.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseState {
    #[default]
    Idle,
    CloseRequested,
    Closed,
}

/// What to do with a disconnect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Close the transport now.
    CloseNow,
    /// Wait until the pending correlation clears.
    Deferred,
    /// Already requested or closed.
    Ignored,
}

#[derive(Debug, Default)]
pub struct CloseCoordinator {
    state: CloseState,
}

impl CloseCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CloseState {
        self.state
    }

    pub fn is_close_requested(&self) -> bool {
        self.state == CloseState::CloseRequested
    }

    pub fn request(&mut self, correlation_pending: bool) -> CloseDecision {
        match self.state {
            CloseState::Idle if correlation_pending => {
                self.state = CloseState::CloseRequested;
                CloseDecision::Deferred
            }
            CloseState::Idle => {
                self.state = CloseState::Closed;
                CloseDecision::CloseNow
            }
            CloseState::CloseRequested | CloseState::Closed => CloseDecision::Ignored,
        }
    }

    /// The pending correlation cleared, by acknowledgment or otherwise.
    /// Returns true if a deferred close must happen now.
    pub fn correlation_cleared(&mut self) -> bool {
        if self.state == CloseState::CloseRequested {
            self.state = CloseState::Closed;
            true
        } else {
            false
        }
    }

    /// The transport is gone, whoever closed it.
    pub fn mark_closed(&mut self) {
        self.state = CloseState::Closed;
    }
}
