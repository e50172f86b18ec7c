//! Participant session state machine.
//!
//! [`Session`] performs no I/O. It consumes inbound frames, user actions and
//! timer polls, each stamped with the current epoch time in milliseconds, and
//! answers with [`Effect`]s for the driver to carry out on the transport.

mod close;
mod correlator;
mod timer;

use std::collections::VecDeque;

use tracing::{debug, info, warn};

pub use close::{CloseCoordinator, CloseDecision, CloseState};
pub use correlator::{AnswerCorrelator, PendingCorrelation, DEFAULT_GRACE_PERIOD};
pub use timer::{Countdown, DeadlineTimer, DEFAULT_TICK_INTERVAL};

use crate::config::ClientConfig;
use crate::error::ActionError;
use crate::protocol::{
    self, AnswerStatus, ClientMessage, DeviceInfo, QuestionShow, ScoreUpdate, ServerMessage,
    CLOSE_REASON, NORMAL_CLOSURE,
};

const LOG_CAPACITY: usize = 200;

/// Connection phase as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Joined,
}

/// Something the driver must do on the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send(ClientMessage),
    Close { code: u16, reason: &'static str },
}

impl Effect {
    fn normal_close() -> Self {
        Effect::Close {
            code: NORMAL_CLOSURE,
            reason: CLOSE_REASON,
        }
    }
}

/// Our answer to the active question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    NotAnswered,
    /// Sent. `accepted` stays `None` until `answer.received` arrives.
    Answered {
        option_index: usize,
        accepted: Option<bool>,
    },
}

/// The question currently open for answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuestion {
    pub question_id: String,
    pub order: u32,
    pub text: String,
    pub options: Vec<String>,
    pub time_limit_seconds: u32,
    pub server_issued_at_ms: i64,
    pub answer_window_id: String,
    pub answer: AnswerState,
}

impl From<QuestionShow> for ActiveQuestion {
    fn from(show: QuestionShow) -> Self {
        Self {
            question_id: show.qid,
            order: show.order,
            text: show.text,
            options: show.options,
            time_limit_seconds: show.time_limit_sec,
            server_issued_at_ms: show.server_ts,
            answer_window_id: show.answer_window_id,
            answer: AnswerState::NotAnswered,
        }
    }
}

/// Latest score the server reported for this user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub delta: i64,
    pub total: i64,
}

pub struct Session {
    room_id: String,
    user_id: String,
    token: String,
    is_host: bool,
    timezone: String,
    phase: Phase,
    question: Option<ActiveQuestion>,
    score: Option<Score>,
    timer: DeadlineTimer,
    correlator: AnswerCorrelator,
    close: CloseCoordinator,
    disconnect_reason: Option<String>,
    log: VecDeque<String>,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            room_id: config.room_id.clone().unwrap_or_default(),
            user_id: config.user_id.clone(),
            token: config.token.clone(),
            is_host: config.is_host,
            timezone: config.timezone.clone(),
            phase: Phase::Disconnected,
            question: None,
            score: None,
            timer: DeadlineTimer::new(config.tick_interval()),
            correlator: AnswerCorrelator::new(config.grace_period()),
            close: CloseCoordinator::new(),
            disconnect_reason: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.question.as_ref()
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.timer.countdown()
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn pending_correlation(&self) -> Option<&PendingCorrelation> {
        self.correlator.pending()
    }

    pub fn close_state(&self) -> CloseState {
        self.close.state()
    }

    pub fn disconnect_reason(&self) -> Option<&str> {
        self.disconnect_reason.as_deref()
    }

    pub fn log(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.log.iter().map(String::as_str)
    }

    /// Whether an answer may be submitted right now.
    pub fn can_answer(&self, now_ms: i64) -> bool {
        self.check_answerable(now_ms).is_ok()
    }

    /// Earliest time `poll_timers` has work to do.
    pub fn next_wakeup_ms(&self) -> Option<i64> {
        match (self.timer.next_tick_ms(), self.correlator.expires_at_ms()) {
            (Some(tick), Some(expiry)) => Some(tick.min(expiry)),
            (tick, expiry) => tick.or(expiry),
        }
    }

    /// Append a line to the activity log.
    pub fn record(&mut self, line: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    pub fn connecting(&mut self) {
        self.phase = Phase::Connecting;
        self.disconnect_reason = None;
    }

    /// The transport is open: join the room.
    pub fn handle_open(&mut self) -> Vec<Effect> {
        info!(room = %self.room_id, user = %self.user_id, "connection open, joining");
        self.phase = Phase::Joined;
        self.record("connection open");

        vec![Effect::Send(ClientMessage::Join {
            room_id: self.room_id.clone(),
            user_id: self.user_id.clone(),
            token: self.token.clone(),
            device: DeviceInfo::new(self.timezone.clone()),
        })]
    }

    /// The transport is gone, closed locally or remotely.
    pub fn transport_closed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        info!(%reason, "connection closed");

        self.timer.stop();
        self.correlator.clear();
        self.close.mark_closed();
        self.phase = Phase::Disconnected;
        self.record(format!("connection closed: {reason}"));
        self.disconnect_reason = Some(reason);
    }

    /// Dispatch one inbound text frame.
    pub fn handle_inbound(&mut self, text: &str, now_ms: i64) -> Vec<Effect> {
        let msg = match protocol::decode(text) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %err, raw = text, "dropping inbound message");
                self.record(text);
                return Vec::new();
            }
        };

        debug!(kind = msg.kind(), "inbound message");
        self.record(msg.kind().to_string());

        match msg {
            ServerMessage::QuestionShow(show) => self.on_question_show(show, now_ms),
            ServerMessage::AnswerReceived(received) => {
                self.on_answer_received(received.status);
                Vec::new()
            }
            ServerMessage::ScoreUpdate(score) => self.on_score_update(&score),
            ServerMessage::QuestionReveal => self.on_question_reveal(),
            ServerMessage::Unknown { kind } => {
                debug!(%kind, "ignoring unrecognized message type");
                Vec::new()
            }
        }
    }

    fn on_question_show(&mut self, show: QuestionShow, now_ms: i64) -> Vec<Effect> {
        info!(qid = %show.qid, order = show.order, limit = show.time_limit_sec, "question shown");

        self.timer.start(show.server_ts, show.time_limit_sec, now_ms);
        self.question = Some(ActiveQuestion::from(show));
        let cleared = self.correlator.clear();
        self.correlation_cleared(cleared)
    }

    fn on_answer_received(&mut self, status: AnswerStatus) {
        if let Some(ActiveQuestion {
            answer: AnswerState::Answered { accepted, .. },
            ..
        }) = &mut self.question
        {
            *accepted = Some(status == AnswerStatus::Accepted);
        }
    }

    fn on_score_update(&mut self, score: &ScoreUpdate) -> Vec<Effect> {
        if score.user_id == self.user_id {
            self.score = Some(Score {
                delta: score.delta,
                total: score.total,
            });
        }

        let resolved = self.correlator.resolve(score, &self.user_id);
        if resolved {
            debug!(qid = ?score.qid, "answer acknowledged");
        }
        self.correlation_cleared(resolved)
    }

    fn on_question_reveal(&mut self) -> Vec<Effect> {
        self.question = None;
        self.timer.stop();
        let cleared = self.correlator.clear();
        self.correlation_cleared(cleared)
    }

    /// Submit `option_index` for the active question.
    pub fn submit_answer(
        &mut self,
        option_index: usize,
        now_ms: i64,
    ) -> Result<Vec<Effect>, ActionError> {
        self.check_answerable(now_ms)?;

        let Some(question) = self.question.as_mut() else {
            return Err(ActionError::NoActiveQuestion);
        };
        if option_index >= question.options.len() {
            return Err(ActionError::InvalidOption {
                index: option_index,
                count: question.options.len(),
            });
        }

        self.correlator.submit(&question.question_id, now_ms)?;
        question.answer = AnswerState::Answered {
            option_index,
            accepted: None,
        };
        info!(qid = %question.question_id, option_index, "answer submitted");

        Ok(vec![Effect::Send(ClientMessage::SubmitAnswer {
            qid: question.question_id.clone(),
            option_index,
            answer_window_id: question.answer_window_id.clone(),
            client_ts: now_ms,
        })])
    }

    pub fn host_start(&mut self) -> Result<Vec<Effect>, ActionError> {
        if self.phase != Phase::Joined {
            return Err(ActionError::NotConnected);
        }
        if !self.is_host {
            return Err(ActionError::NotHost);
        }

        info!(room = %self.room_id, "requesting match start");
        self.record("host.start sent");
        Ok(vec![Effect::Send(ClientMessage::HostStart {
            room_id: self.room_id.clone(),
        })])
    }

    /// The user wants to disconnect.
    pub fn request_close(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Disconnected {
            return Vec::new();
        }

        match self.close.request(self.correlator.is_pending()) {
            CloseDecision::CloseNow => vec![Effect::normal_close()],
            CloseDecision::Deferred => {
                info!("close deferred until the pending answer is scored");
                self.record("waiting for score.update before closing");
                Vec::new()
            }
            CloseDecision::Ignored => Vec::new(),
        }
    }

    /// Service the countdown and the grace period.
    pub fn poll_timers(&mut self, now_ms: i64) -> Vec<Effect> {
        self.timer.tick(now_ms);

        let expired = self.correlator.expire(now_ms);
        if expired {
            info!("no score.update within the grace period");
        }
        self.correlation_cleared(expired)
    }

    fn correlation_cleared(&mut self, cleared: bool) -> Vec<Effect> {
        if cleared && self.close.correlation_cleared() {
            vec![Effect::normal_close()]
        } else {
            Vec::new()
        }
    }

    fn check_answerable(&self, now_ms: i64) -> Result<(), ActionError> {
        if self.phase != Phase::Joined {
            return Err(ActionError::NotConnected);
        }
        if self.close.state() != CloseState::Idle {
            return Err(ActionError::Closing);
        }
        let Some(question) = &self.question else {
            return Err(ActionError::NoActiveQuestion);
        };
        if question.answer != AnswerState::NotAnswered
            || self.correlator.is_pending_for(&question.question_id)
        {
            return Err(ActionError::AlreadyAnswered);
        }
        if self.timer.is_expired(now_ms) {
            return Err(ActionError::TimeUp);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const T: i64 = 1_700_000_000_000;
    const USER: &str = "8e4afa0a-6899-4119-91e2-55792b2e993f";

    fn config() -> ClientConfig {
        ClientConfig {
            room_id: Some("room-1".to_string()),
            user_id: USER.to_string(),
            ..ClientConfig::default()
        }
    }

    fn joined() -> Session {
        let mut session = Session::new(&config());
        session.connecting();
        session.handle_open();
        session
    }

    fn question_show(qid: &str, limit: u32, server_ts: i64) -> String {
        json!({
            "type": "question.show",
            "payload": {
                "qid": qid, "order": 1, "text": "Pick one", "options": ["a", "b", "c"],
                "timeLimitSec": limit, "serverTs": server_ts, "answerWindowId": format!("w-{qid}")
            }
        })
        .to_string()
    }

    fn score_update(user_id: &str, qid: Option<&str>) -> String {
        let mut payload = json!({ "userId": user_id, "delta": 10, "total": 40 });
        if let Some(qid) = qid {
            payload["qid"] = json!(qid);
        }
        json!({ "type": "score.update", "payload": payload }).to_string()
    }

    const REVEAL: &str = r#"{"type":"question.reveal","payload":{}}"#;

    fn close_effect() -> Effect {
        Effect::Close {
            code: 1000,
            reason: "client-closed",
        }
    }

    #[test]
    fn test_open_sends_join() {
        let mut session = Session::new(&config());
        assert_eq!(session.phase(), Phase::Disconnected);
        session.connecting();
        assert_eq!(session.phase(), Phase::Connecting);

        let effects = session.handle_open();
        assert_eq!(session.phase(), Phase::Joined);
        assert_eq!(effects.len(), 1);
        let Effect::Send(ClientMessage::Join {
            room_id,
            user_id,
            token,
            device,
        }) = &effects[0]
        else {
            panic!("expected auth.join, got {effects:?}");
        };
        assert_eq!(room_id, "room-1");
        assert_eq!(user_id, USER);
        assert_eq!(token, "demo");
        assert_eq!(device.latency_ms, 0);
    }

    #[test]
    fn test_question_show_starts_countdown() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T + 500);

        let question = session.active_question().unwrap();
        assert_eq!(question.question_id, "q1");
        assert_eq!(question.answer_window_id, "w-q1");
        assert_eq!(question.answer, AnswerState::NotAnswered);
        assert_eq!(session.countdown().unwrap().remaining_seconds, 10);
        assert_eq!(session.next_wakeup_ms(), Some(T + 600));
        assert!(session.can_answer(T + 500));
    }

    #[test]
    fn test_submit_sends_answer_once() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);

        let effects = session.submit_answer(1, T + 2_000).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Send(ClientMessage::SubmitAnswer {
                qid: "q1".to_string(),
                option_index: 1,
                answer_window_id: "w-q1".to_string(),
                client_ts: T + 2_000,
            })]
        );
        assert_eq!(
            session.active_question().unwrap().answer,
            AnswerState::Answered {
                option_index: 1,
                accepted: None
            }
        );
        assert_eq!(session.pending_correlation().unwrap().expires_at_ms, T + 6_000);

        assert_eq!(session.submit_answer(2, T + 2_100), Err(ActionError::AlreadyAnswered));
        assert_eq!(session.pending_correlation().unwrap().created_at_ms, T + 2_000);
    }

    #[test]
    fn test_resubmit_after_grace_timeout_is_still_rejected() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 30, T), T);
        session.submit_answer(0, T).unwrap();

        session.poll_timers(T + 4_000);
        assert!(session.pending_correlation().is_none());
        assert_eq!(session.submit_answer(0, T + 4_100), Err(ActionError::AlreadyAnswered));
    }

    #[test]
    fn test_submit_rejections() {
        let mut session = Session::new(&config());
        assert_eq!(session.submit_answer(0, T), Err(ActionError::NotConnected));

        let mut session = joined();
        assert_eq!(session.submit_answer(0, T), Err(ActionError::NoActiveQuestion));

        session.handle_inbound(&question_show("q1", 10, T), T);
        assert_eq!(
            session.submit_answer(3, T),
            Err(ActionError::InvalidOption { index: 3, count: 3 })
        );
        assert!(session.pending_correlation().is_none());
    }

    #[test]
    fn test_deadline_scenario() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);

        let mut now = T;
        while let Some(due) = session.next_wakeup_ms() {
            now = due;
            assert!(session.poll_timers(now).is_empty());
        }

        assert_eq!(now, T + 10_000);
        assert_eq!(session.countdown().unwrap().remaining_seconds, 0);
        assert!(!session.can_answer(now));
        assert_eq!(session.submit_answer(0, now), Err(ActionError::TimeUp));
        // Reaching zero does not clear the question by itself.
        assert!(session.active_question().is_some());
    }

    #[test]
    fn test_answer_received_updates_acceptance() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);

        session.handle_inbound(r#"{"type":"answer.received","payload":{"status":"ACCEPTED"}}"#, T);
        assert_eq!(session.active_question().unwrap().answer, AnswerState::NotAnswered);

        session.submit_answer(2, T + 100).unwrap();
        session.handle_inbound(
            r#"{"type":"answer.received","payload":{"status":"ACCEPTED"}}"#,
            T + 200,
        );
        assert_eq!(
            session.active_question().unwrap().answer,
            AnswerState::Answered {
                option_index: 2,
                accepted: Some(true)
            }
        );
    }

    #[test]
    fn test_score_update_resolves_matching_correlation() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();

        session.handle_inbound(&score_update("someone-else", Some("q1")), T + 100);
        session.handle_inbound(&score_update(USER, Some("q0")), T + 200);
        assert_eq!(session.pending_correlation().unwrap().question_id, "q1");

        session.handle_inbound(&score_update(USER, Some("q1")), T + 300);
        assert!(session.pending_correlation().is_none());
        assert_eq!(session.score(), Some(Score { delta: 10, total: 40 }));
    }

    #[test]
    fn test_close_without_pending_is_immediate() {
        let mut session = joined();
        assert_eq!(session.request_close(), vec![close_effect()]);
        assert_eq!(session.close_state(), CloseState::Closed);
    }

    #[test]
    fn test_close_waits_for_score_update() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();

        assert!(session.request_close().is_empty());
        assert_eq!(session.close_state(), CloseState::CloseRequested);
        assert!(session.poll_timers(T + 1_000).is_empty());
        let effects = session.handle_inbound(&score_update("someone-else", Some("q1")), T + 1_200);
        assert!(effects.is_empty());
        assert_eq!(session.close_state(), CloseState::CloseRequested);

        let effects = session.handle_inbound(&score_update(USER, Some("q1")), T + 1_500);
        assert_eq!(effects, vec![close_effect()]);
        assert_eq!(session.close_state(), CloseState::Closed);
    }

    #[test]
    fn test_score_without_qid_releases_deferred_close() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        assert!(session.request_close().is_empty());

        // Someone else's qid-less score does not count.
        assert!(session.handle_inbound(&score_update("someone-else", None), T + 500).is_empty());
        assert_eq!(session.close_state(), CloseState::CloseRequested);

        let effects = session.handle_inbound(&score_update(USER, None), T + 800);
        assert_eq!(effects, vec![close_effect()]);
        assert_eq!(session.close_state(), CloseState::Closed);
        assert!(session.pending_correlation().is_none());
        assert_eq!(session.score(), Some(Score { delta: 10, total: 40 }));
    }

    #[test]
    fn test_extreme_server_timestamp_is_already_expired() {
        let mut session = joined();
        let show = json!({
            "type": "question.show",
            "payload": {
                "qid": "q1", "text": "Pick one", "options": ["a", "b"],
                "timeLimitSec": 10, "serverTs": i64::MIN, "answerWindowId": "w-q1"
            }
        })
        .to_string();

        assert!(session.handle_inbound(&show, T).is_empty());
        assert_eq!(session.active_question().unwrap().question_id, "q1");
        assert_eq!(session.countdown().unwrap().remaining_seconds, 0);
        assert_eq!(session.next_wakeup_ms(), None);
        assert_eq!(session.submit_answer(0, T), Err(ActionError::TimeUp));
    }

    #[test]
    fn test_close_proceeds_after_grace_timeout() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T + 1_000).unwrap();
        session.request_close();

        assert_eq!(session.next_wakeup_ms(), Some(T + 100));
        assert!(session.poll_timers(T + 4_999).is_empty());
        assert_eq!(session.poll_timers(T + 5_000), vec![close_effect()]);
        assert!(session.pending_correlation().is_none());
    }

    #[test]
    fn test_close_requested_rejects_new_answers() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        session.request_close();

        session.handle_inbound(&question_show("q2", 10, T + 1_000), T + 1_000);
        assert_eq!(session.submit_answer(0, T + 1_000), Err(ActionError::Closing));
    }

    #[test]
    fn test_new_question_releases_deferred_close() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        session.request_close();

        let effects = session.handle_inbound(&question_show("q2", 10, T + 2_000), T + 2_000);
        assert_eq!(effects, vec![close_effect()]);
    }

    #[test]
    fn test_reveal_clears_question_timer_and_correlation() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        session.request_close();

        let effects = session.handle_inbound(REVEAL, T + 1_000);
        assert_eq!(effects, vec![close_effect()]);
        assert!(session.active_question().is_none());
        assert!(session.countdown().is_none());
        assert!(session.pending_correlation().is_none());
        assert_eq!(session.next_wakeup_ms(), None);
    }

    #[test]
    fn test_score_update_after_reveal_is_stale() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        session.handle_inbound(REVEAL, T + 1_000);

        session.handle_inbound(&question_show("q2", 10, T + 2_000), T + 2_000);
        session.submit_answer(1, T + 2_500).unwrap();

        // Late acknowledgment for q1 must not resolve q2.
        session.handle_inbound(&score_update(USER, Some("q1")), T + 2_600);
        assert_eq!(session.pending_correlation().unwrap().question_id, "q2");
    }

    #[test]
    fn test_malformed_and_unknown_messages_leave_state_untouched() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();
        let question = session.active_question().cloned();
        let pending = session.pending_correlation().cloned();

        assert!(session.handle_inbound("{{garbage", T + 10).is_empty());
        let unknown = r#"{"type":"lobby.update","payload":{}}"#;
        assert!(session.handle_inbound(unknown, T + 20).is_empty());
        let incomplete = r#"{"type":"question.show","payload":{"qid":"q9"}}"#;
        assert!(session.handle_inbound(incomplete, T + 30).is_empty());

        assert_eq!(session.active_question().cloned(), question);
        assert_eq!(session.pending_correlation().cloned(), pending);
        assert!(session.log().any(|line| line == "{{garbage"));
    }

    #[test]
    fn test_host_start() {
        let mut session = joined();
        assert_eq!(session.host_start(), Err(ActionError::NotHost));

        let mut session = Session::new(&ClientConfig {
            is_host: true,
            ..config()
        });
        assert_eq!(session.host_start(), Err(ActionError::NotConnected));
        session.handle_open();
        assert_eq!(
            session.host_start().unwrap(),
            vec![Effect::Send(ClientMessage::HostStart {
                room_id: "room-1".to_string()
            })]
        );
    }

    #[test]
    fn test_transport_closed_resets_to_disconnected() {
        let mut session = joined();
        session.handle_inbound(&question_show("q1", 10, T), T);
        session.submit_answer(0, T).unwrap();

        session.transport_closed("connection reset");
        assert_eq!(session.phase(), Phase::Disconnected);
        assert!(session.countdown().is_none());
        assert!(session.pending_correlation().is_none());
        assert_eq!(session.next_wakeup_ms(), None);
        assert_eq!(session.disconnect_reason(), Some("connection reset"));
        assert!(session.request_close().is_empty());
    }

    #[test]
    fn test_log_is_bounded() {
        let mut session = joined();
        for i in 0..(LOG_CAPACITY + 10) {
            session.record(format!("line {i}"));
        }
        assert_eq!(session.log().len(), LOG_CAPACITY);
        assert_eq!(session.log().last(), Some(format!("line {}", LOG_CAPACITY + 9).as_str()));
    }
}
