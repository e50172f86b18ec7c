//! # quiz-client
//!
//! A participant client for a real-time quiz room.
//!
//! The [`session`] module holds the protocol state machine: it tracks the
//! active question against the server-issued deadline, allows one answer per
//! question and defers disconnection until that answer has been scored or the
//! grace period runs out. The [`client`] module connects it to a WebSocket and
//! a terminal UI.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_client::{client, ClientConfig, ClientError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     let config = ClientConfig {
//!         room_id: Some("room-1".to_string()),
//!         ..ClientConfig::default()
//!     };
//!     client::run(config).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod terminal;

pub use config::ClientConfig;
pub use error::{ActionError, ClientError, ConfigError, DecodeError, TransportError};
pub use session::{Effect, Phase, Session};
