//! Interactive participant client.

use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Session;
use crate::terminal::TerminalGuard;

use super::clock::Clock;
use super::driver::{drive, UserCommand};
use super::transport::WsTransport;
use super::ui;

/// Run the quiz client until the user quits.
///
/// A lost connection is never retried automatically; the user decides
/// whether to reconnect.
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let url = config.play_url()?;
    let mut guard = TerminalGuard::enter()?;

    let (tx, mut commands) = mpsc::unbounded_channel::<UserCommand>();
    spawn_input_reader(tx);

    loop {
        let clock = Clock::system();
        let mut session = Session::new(&config);
        session.connecting();
        guard
            .terminal()
            .draw(|frame| ui::render(frame, &session, clock.now_ms()))?;

        info!(%url, "connecting");
        let connected = tokio::select! {
            result = WsTransport::connect(&url) => Ok(result),
            interrupt = wait_for_interrupt(&mut commands) => Err(interrupt),
        };

        let quit_requested = match connected {
            Err(Interrupt::Quit) => true,
            Err(Interrupt::Disconnect) => {
                info!("connection attempt cancelled");
                session.transport_closed("connection attempt cancelled");
                false
            }
            Ok(Ok(mut transport)) => {
                let terminal = guard.terminal();
                let mut redraw = |session: &Session| {
                    let drawn = terminal.draw(|frame| ui::render(frame, session, clock.now_ms()));
                    if let Err(e) = drawn {
                        warn!(error = %e, "failed to draw");
                    }
                };
                drive(&mut transport, &mut session, &mut commands, &clock, &mut redraw)
                    .await
                    .quit_requested
            }
            Ok(Err(e)) => {
                warn!(error = %e, "connection failed");
                session.transport_closed(format!("failed to connect: {e}"));
                false
            }
        };

        if quit_requested {
            break;
        }

        guard
            .terminal()
            .draw(|frame| ui::render(frame, &session, clock.now_ms()))?;
        if !wait_for_reconnect(&mut commands).await {
            break;
        }
        info!("reconnect requested");
    }

    Ok(())
}

/// Stops a connection attempt that is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Give up on this connection and wait for a reconnect.
    Disconnect,
    /// Exit the client.
    Quit,
}

/// Resolves when the user cancels a connection attempt.
///
/// A closed command channel counts as a quit.
async fn wait_for_interrupt(commands: &mut mpsc::UnboundedReceiver<UserCommand>) -> Interrupt {
    while let Some(command) = commands.recv().await {
        match command {
            UserCommand::Disconnect => return Interrupt::Disconnect,
            UserCommand::Quit => return Interrupt::Quit,
            _ => {}
        }
    }
    Interrupt::Quit
}

/// Returns true to reconnect, false to exit.
async fn wait_for_reconnect(commands: &mut mpsc::UnboundedReceiver<UserCommand>) -> bool {
    while let Some(command) = commands.recv().await {
        match command {
            UserCommand::Reconnect => return true,
            UserCommand::Quit => return false,
            _ => {}
        }
    }
    false
}

/// Terminal input is blocking, so it is read on its own thread and forwarded.
fn spawn_input_reader(tx: mpsc::UnboundedSender<UserCommand>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = map_key(key) {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read terminal input");
                    break;
                }
            }
        }
    });
}

fn map_key(key: KeyEvent) -> Option<UserCommand> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char(c @ '1'..='9') => Some(UserCommand::Answer(c as usize - '1' as usize)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(UserCommand::HostStart),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(UserCommand::Disconnect),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UserCommand::Reconnect),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(UserCommand::Quit),
        _ => None,
    }
}
