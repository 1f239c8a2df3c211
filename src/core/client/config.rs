//! Configuration for the Stronghold client.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `max_retries` | 0 | Retries for ordinary calls after a transport failure |
//! | `connect_retries` | 4 | Retries for the handshake made by `Session::connect` |
//! | `retry_delay_ms` | 0 | Pause between attempts |
//! | `connection_timeout_secs` | 30 | TCP connect timeout |
//! | `request_timeout_ms` | none | Whole-request timeout; also bounds long polls |
//! | `enable_logging` | false | Log retries at `warn` |
//! | `greeting` | `Stronghold says hi` | Body the handshake must receive |
//! | `max_idle_connections` | 16 | Idle pool size per host |
//!
//! # Examples
//!
//! ```
//! use stronghold_rs::ClientConfig;
//!
//! let config = ClientConfig {
//!     connect_retries: 1,
//!     ..Default::default()
//! };
//! assert_eq!(config.max_retries, 0);
//! assert_eq!(config.greeting, "Stronghold says hi");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::client::retry::RetryConfig;
use crate::core::error::{Result, StrongholdError};

/// Endpoint a Stronghold service listens on when nobody says otherwise.
///
/// Nothing in this crate falls back to it; pass it to
/// [`Session::connect`](crate::Session::connect) explicitly.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5040";

/// Body of `GET /` on a genuine Stronghold service.
pub const GREETING: &str = "Stronghold says hi";

/// Configuration for a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Retries for ordinary calls.
    ///
    /// Only transport failures are retried; status mismatches never are.
    pub max_retries: u32,

    /// Retries for the greeting handshake made while connecting.
    pub connect_retries: u32,

    /// Pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,

    /// Maximum time to wait for a connection to be established.
    pub connection_timeout_secs: u64,

    /// Maximum time for a whole request, in milliseconds.
    ///
    /// `None` leaves requests unbounded, which is what long polls need. Set it
    /// only when every call, `next_materialized` included, should give up.
    pub request_timeout_ms: Option<u64>,

    /// Log retries at `warn` through `tracing`.
    pub enable_logging: bool,

    /// Body the handshake must receive for the endpoint to count as Stronghold.
    pub greeting: String,

    /// Maximum idle pooled connections per host.
    pub max_idle_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            max_retries: 0,
            connect_retries: 4,
            retry_delay_ms: 0,
            connection_timeout_secs: 30,
            request_timeout_ms: None,
            enable_logging: false,
            greeting: GREETING.to_string(),
            max_idle_connections: 16,
        }
    }
}

impl ClientConfig {
    /// Load a configuration from a JSON file.
    ///
    /// A missing file yields the defaults; unknown keys are ignored.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(StrongholdError::Config(format!(
                    "could not read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            StrongholdError::Config(format!("could not parse {}: {}", path.display(), e))
        })
    }

    /// Retry policy for ordinary calls.
    pub fn call_retry(&self) -> RetryConfig {
        RetryConfig::no_retry()
            .with_max_retries(self.max_retries)
            .with_backoff(Duration::from_millis(self.retry_delay_ms))
    }

    /// Retry policy for the connection handshake.
    pub fn connect_retry(&self) -> RetryConfig {
        RetryConfig::no_retry()
            .with_max_retries(self.connect_retries)
            .with_backoff(Duration::from_millis(self.retry_delay_ms))
    }
}
