//! Event loop that owns a [`Session`] for the lifetime of one connection.
//!
//! Inbound frames, user commands and timer wakeups are handled one at a time
//! on a single task; the session never needs a lock.

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::protocol;
use crate::session::{Effect, Session};

use super::clock::Clock;
use super::transport::Transport;

/// Actions coming from the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Answer(usize),
    HostStart,
    /// Disconnect gracefully and stay in the client.
    Disconnect,
    /// Reconnect after a disconnect.
    Reconnect,
    /// Disconnect gracefully and exit.
    Quit,
}

/// Gets to look at the session after every change.
pub trait SessionObserver {
    fn on_update(&mut self, session: &Session);
}

impl<F: FnMut(&Session)> SessionObserver for F {
    fn on_update(&mut self, session: &Session) {
        self(session)
    }
}

/// Why [`drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveOutcome {
    pub quit_requested: bool,
}

/// Run `session` over an already-open `transport` until the connection ends.
///
/// Sends the join command first, then services the connection. Returns once
/// the transport is closed by either side; there is no automatic reconnect.
pub async fn drive<T, O>(
    transport: &mut T,
    session: &mut Session,
    commands: &mut mpsc::UnboundedReceiver<UserCommand>,
    clock: &Clock,
    observer: &mut O,
) -> DriveOutcome
where
    T: Transport,
    O: SessionObserver,
{
    let mut quit_requested = false;
    let mut commands_open = true;

    let effects = session.handle_open();
    let mut closed = apply(transport, session, effects).await;
    observer.on_update(session);

    while !closed {
        let wake = session.next_wakeup_ms().map(|ms| clock.instant_at(ms));
        let timer = sleep_until(wake.unwrap_or_else(Instant::now));

        let effects = tokio::select! {
            inbound = transport.recv() => match inbound {
                Some(Ok(text)) => session.handle_inbound(&text, clock.now_ms()),
                Some(Err(e)) => {
                    warn!(error = %e, "transport error");
                    session.transport_closed(format!("connection error: {e}"));
                    break;
                }
                None => {
                    session.transport_closed("closed by server");
                    break;
                }
            },
            command = commands.recv(), if commands_open => {
                let command = command.unwrap_or_else(|| {
                    commands_open = false;
                    UserCommand::Quit
                });
                if command == UserCommand::Quit {
                    quit_requested = true;
                }
                handle_command(session, command, clock.now_ms())
            },
            _ = timer, if wake.is_some() => session.poll_timers(clock.now_ms()),
        };

        closed = apply(transport, session, effects).await;
        observer.on_update(session);
    }

    observer.on_update(session);
    DriveOutcome { quit_requested }
}

fn handle_command(session: &mut Session, command: UserCommand, now_ms: i64) -> Vec<Effect> {
    let result = match command {
        UserCommand::Answer(index) => session.submit_answer(index, now_ms),
        UserCommand::HostStart => session.host_start(),
        UserCommand::Disconnect | UserCommand::Quit => Ok(session.request_close()),
        UserCommand::Reconnect => Ok(Vec::new()),
    };

    result.unwrap_or_else(|err| {
        debug!(?command, error = %err, "command rejected");
        session.record(format!("{command:?} rejected: {err}"));
        Vec::new()
    })
}

/// Carry out `effects`. Returns true once the transport has been closed.
async fn apply<T: Transport>(
    transport: &mut T,
    session: &mut Session,
    effects: Vec<Effect>,
) -> bool {
    for effect in effects {
        match effect {
            Effect::Send(msg) => {
                let text = match protocol::encode(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, ?msg, "failed to encode outbound message");
                        continue;
                    }
                };
                if let Err(e) = transport.send(text).await {
                    warn!(error = %e, "send failed");
                    session.transport_closed(format!("connection error: {e}"));
                    return true;
                }
            }
            Effect::Close { code, reason } => {
                if let Err(e) = transport.close(code, reason).await {
                    debug!(error = %e, "close handshake failed");
                }
                session.transport_closed("closed by client");
                return true;
            }
        }
    }
    false
}
