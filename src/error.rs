//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An inbound frame that could not be decoded.
///
/// See [`ServerMessage`](crate::protocol::ServerMessage).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid {kind} payload: {reason}")]
    Invalid {
        kind: &'static str,
        reason: &'static str,
    },
}

/// A user action the session refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not connected")]
    NotConnected,
    #[error("no active question")]
    NoActiveQuestion,
    #[error("already answered")]
    AlreadyAnswered,
    #[error("time is up")]
    TimeUp,
    #[error("option {index} does not exist ({count} options)")]
    InvalidOption { index: usize, count: usize },
    #[error("disconnect in progress")]
    Closing,
    #[error("host role not enabled")]
    NotHost,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no room id given; pass --room or set roomId in the config file")]
    MissingRoom,
}

/// Top-level error for the client binary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("logging initialization failed: {0}")]
    Logging(String),
}
