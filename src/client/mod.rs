//! Quiz participant client.
//!
//! Connects to a room's play endpoint over WebSocket and runs a
//! [`Session`](crate::session::Session) on a single task.

mod client;
mod clock;
mod driver;
mod transport;
mod ui;

pub use client::run;
pub use clock::Clock;
pub use driver::{drive, DriveOutcome, SessionObserver, UserCommand};
pub use transport::{Transport, WsTransport};
