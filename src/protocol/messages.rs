//! Protocol messages for the play connection.
//!
//! Every frame is a JSON envelope `{ "type": ..., "payload": { ... } }`
//! carried as a WebSocket text message.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// Close code for a normal, user-initiated closure.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Reason sent alongside [`NORMAL_CLOSURE`].
pub const CLOSE_REASON: &str = "client-closed";

pub const QUESTION_SHOW: &str = "question.show";
pub const ANSWER_RECEIVED: &str = "answer.received";
pub const SCORE_UPDATE: &str = "score.update";
pub const QUESTION_REVEAL: &str = "question.reveal";

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Sent once, right after the connection opens.
    #[serde(rename = "auth.join", rename_all = "camelCase")]
    Join {
        room_id: String,
        user_id: String,
        token: String,
        device: DeviceInfo,
    },

    /// Asks the server to start the match. Host role only.
    #[serde(rename = "host.start", rename_all = "camelCase")]
    HostStart { room_id: String },

    /// Answer for the current question, at most once per question.
    #[serde(rename = "answer.submit", rename_all = "camelCase")]
    SubmitAnswer {
        qid: String,
        option_index: usize,
        answer_window_id: String,
        client_ts: i64,
    },
}

/// Client metadata attached to the join command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub ua: String,
    pub tz: String,
    pub latency_ms: u64,
}

impl DeviceInfo {
    pub fn new(tz: impl Into<String>) -> Self {
        Self {
            ua: format!("quiz-client/{}", env!("CARGO_PKG_VERSION")),
            tz: tz.into(),
            latency_ms: 0,
        }
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    QuestionShow(QuestionShow),
    AnswerReceived(AnswerReceived),
    ScoreUpdate(ScoreUpdate),
    QuestionReveal,
    /// A type this client does not know about. Kept for forward compatibility.
    Unknown { kind: String },
}

impl ServerMessage {
    /// The wire `type` of this message.
    pub fn kind(&self) -> &str {
        match self {
            ServerMessage::QuestionShow(_) => QUESTION_SHOW,
            ServerMessage::AnswerReceived(_) => ANSWER_RECEIVED,
            ServerMessage::ScoreUpdate(_) => SCORE_UPDATE,
            ServerMessage::QuestionReveal => QUESTION_REVEAL,
            ServerMessage::Unknown { kind } => kind,
        }
    }
}

/// A new question has started.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionShow {
    pub qid: String,
    #[serde(default)]
    pub order: u32,
    pub text: String,
    pub options: Vec<String>,
    pub time_limit_sec: u32,
    /// Server clock (epoch ms) at the moment the question was issued.
    pub server_ts: i64,
    pub answer_window_id: String,
}

impl QuestionShow {
    fn validate(self) -> Result<Self, DecodeError> {
        if self.qid.is_empty() {
            return Err(DecodeError::Invalid {
                kind: QUESTION_SHOW,
                reason: "empty qid",
            });
        }
        if self.options.is_empty() {
            return Err(DecodeError::Invalid {
                kind: QUESTION_SHOW,
                reason: "no options",
            });
        }
        Ok(self)
    }
}

/// Server acknowledged receipt of our answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerReceived {
    pub status: AnswerStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerStatus {
    Accepted,
    #[serde(other)]
    Other,
}

/// Score change for one participant.
///
/// `qid` is absent on some server paths; see
/// [`AnswerCorrelator::resolve`](crate::session::AnswerCorrelator::resolve).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub user_id: String,
    #[serde(default)]
    pub qid: Option<String>,
    #[serde(default)]
    pub delta: i64,
    #[serde(default)]
    pub total: i64,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// Decode one inbound text frame.
///
/// Unrecognized types decode to [`ServerMessage::Unknown`] rather than an
/// error.
pub fn decode(text: &str) -> Result<ServerMessage, DecodeError> {
    let envelope: Envelope = serde_json::from_str(text)?;

    let msg = match envelope.kind.as_str() {
        QUESTION_SHOW => {
            let show: QuestionShow = payload(QUESTION_SHOW, envelope.payload)?;
            ServerMessage::QuestionShow(show.validate()?)
        }
        ANSWER_RECEIVED => {
            ServerMessage::AnswerReceived(payload(ANSWER_RECEIVED, envelope.payload)?)
        }
        SCORE_UPDATE => ServerMessage::ScoreUpdate(payload(SCORE_UPDATE, envelope.payload)?),
        QUESTION_REVEAL => ServerMessage::QuestionReveal,
        _ => ServerMessage::Unknown {
            kind: envelope.kind,
        },
    };

    Ok(msg)
}

/// Encode one outbound message as a text frame.
pub fn encode(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

fn payload<T: DeserializeOwned>(kind: &'static str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Payload { kind, source })
}
