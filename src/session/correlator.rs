//! Pairs a submitted answer with the `score.update` that acknowledges it.

use std::time::Duration;

use tracing::warn;

use crate::error::ActionError;
use crate::protocol::ScoreUpdate;

use super::timer::duration_ms;

/// How long to wait for a scoring acknowledgment.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(4000);

/// An answer that has been sent but not yet scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCorrelation {
    pub question_id: String,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

#[derive(Debug)]
pub struct AnswerCorrelator {
    grace_period: Duration,
    pending: Option<PendingCorrelation>,
}

impl AnswerCorrelator {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            grace_period,
            pending: None,
        }
    }

    /// Start awaiting the acknowledgment for `question_id`.
    ///
    /// A correlation for a different question is replaced; one for the same
    /// question means the answer was already sent.
    pub fn submit(&mut self, question_id: &str, now_ms: i64) -> Result<(), ActionError> {
        if self.is_pending_for(question_id) {
            return Err(ActionError::AlreadyAnswered);
        }

        self.pending = Some(PendingCorrelation {
            question_id: question_id.to_string(),
            created_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(duration_ms(self.grace_period)),
        });
        Ok(())
    }

    /// Resolve the pending correlation if `ack` is ours and for the same
    /// question. Returns whether it was resolved.
    ///
    /// Some server paths omit `qid`; such an acknowledgment for our user
    /// matches the single pending correlation.
    pub fn resolve(&mut self, ack: &ScoreUpdate, own_user_id: &str) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        if ack.user_id != own_user_id {
            return false;
        }

        match ack.qid.as_deref() {
            Some(qid) if qid == pending.question_id => {}
            Some(_) => return false,
            None => {
                warn!(
                    awaiting = %pending.question_id,
                    "score.update without qid; matching the pending answer"
                );
            }
        }

        self.pending = None;
        true
    }

    /// Drop the correlation if its grace period is over. Returns whether it
    /// expired.
    pub fn expire(&mut self, now_ms: i64) -> bool {
        match &self.pending {
            Some(pending) if now_ms >= pending.expires_at_ms => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the correlation unconditionally. Returns whether one existed.
    pub fn clear(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<&PendingCorrelation> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_pending_for(&self, question_id: &str) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.question_id == question_id)
    }

    pub fn expires_at_ms(&self) -> Option<i64> {
        self.pending.as_ref().map(|pending| pending.expires_at_ms)
    }
}

impl Default for AnswerCorrelator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}
