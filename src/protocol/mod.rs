//! Wire protocol for the play connection.

mod messages;

pub use messages::*;
