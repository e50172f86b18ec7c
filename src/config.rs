//! Client configuration.
//!
//! Loaded once at startup from a JSON file, overridden from the command line,
//! and written back so the last room and identity survive restarts.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::session::{DEFAULT_GRACE_PERIOD, DEFAULT_TICK_INTERVAL};

pub const DEFAULT_CONFIG_PATH: &str = "quiz-client.json";
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub server_url: String,
    pub room_id: Option<String>,
    pub user_id: String,
    pub token: String,
    pub is_host: bool,
    pub timezone: String,
    pub grace_period_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            room_id: None,
            user_id: Uuid::new_v4().to_string(),
            token: "demo".to_string(),
            is_host: false,
            timezone: std::env::var("TZ")
                .ok()
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| "UTC".to_string()),
            grace_period_ms: DEFAULT_GRACE_PERIOD.as_millis() as u64,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl ClientConfig {
    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let json_content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&json_content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json_content = serde_json::to_string_pretty(self)?;

        fs::write(path, json_content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn room(&self) -> Result<&str, ConfigError> {
        self.room_id
            .as_deref()
            .filter(|room| !room.trim().is_empty())
            .ok_or(ConfigError::MissingRoom)
    }

    /// WebSocket URL of the play endpoint for the configured room.
    pub fn play_url(&self) -> Result<String, ConfigError> {
        Ok(format!(
            "{}/v1/rooms/{}/play",
            self.server_url.trim_end_matches('/'),
            self.room()?
        ))
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
