//! Configuration for listsync
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use uuid::Uuid;

use crate::api::View;

/// Listsync - client-side reconciliation engine for shared lists
#[derive(Parser, Debug, Clone)]
#[command(name = "listsync")]
#[command(about = "Keeps local list collections in sync with a lists server")]
pub struct Args {
    /// Unique identifier for this session instance
    #[arg(long, env = "SESSION_ID", default_value_t = Uuid::new_v4())]
    pub session_id: Uuid,

    /// Base URL of the lists server
    #[arg(long, env = "API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Bearer token sent on every request
    #[arg(long, env = "AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Interval between snapshot polls in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value = "5000")]
    pub poll_interval_ms: u64,

    /// Request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Sync the completed-lists view instead of the full view
    #[arg(long, env = "COMPLETED_ONLY", default_value = "false")]
    pub completed_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Which snapshot view this session reads
    pub fn view(&self) -> View {
        if self.completed_only {
            View::Completed
        } else {
            View::All
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("API_URL must be an http(s) URL, got {}", self.api_url));
        }
        if self.api_url.ends_with('/') {
            return Err("API_URL must not end with a trailing slash".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("POLL_INTERVAL_MS must be greater than zero".to_string());
        }
        Ok(())
    }
}
