use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use quiz_client::{client, ClientConfig, ClientError};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Join a live quiz room from the terminal", long_about = None)]
struct Args {
    /// JSON file holding the client configuration; updated after each run
    #[arg(short, long, default_value = quiz_client::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Base WebSocket URL of the quiz server
    #[arg(long)]
    server: Option<String>,

    /// Room to join
    #[arg(short, long)]
    room: Option<String>,

    /// Participant id
    #[arg(short, long)]
    user: Option<String>,

    /// Join token
    #[arg(long)]
    token: Option<String>,

    /// Act as the room host (enables starting the match)
    #[arg(long, conflicts_with = "no_host")]
    host: bool,

    /// Stop acting as the room host
    #[arg(long)]
    no_host: bool,

    /// Minimum log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// File to write logs to; the terminal is taken by the UI
    #[arg(long, default_value = "quiz-client.log")]
    log_file: PathBuf,
}

impl Args {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(room) = &self.room {
            config.room_id = Some(room.clone());
        }
        if let Some(user) = &self.user {
            config.user_id = user.clone();
        }
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        if self.host {
            config.is_host = true;
        }
        if self.no_host {
            config.is_host = false;
        }
    }
}

fn init_logging(args: &Args) -> Result<(), ClientError> {
    let file = File::create(&args.log_file)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .map_err(|e| ClientError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| ClientError::Logging(e.to_string()))
}

async fn run(args: Args) -> Result<(), ClientError> {
    init_logging(&args)?;

    let mut config = ClientConfig::load(&args.config)?;
    args.apply(&mut config);
    config.room()?;
    config.save(&args.config)?;
    debug!(?config, path = %args.config.display(), "configuration loaded");

    client::run(config).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz client: {}", e);
        std::process::exit(1);
    }
}
