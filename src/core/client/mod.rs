//! Stronghold client implementation.
//!
//! Everything starts from a [`Session`], which is bound to a single endpoint
//! and verified on construction. From there:
//!
//! - [`Session::head`] gives the latest [`Version`]
//! - [`Version::tree`] reads configuration as of that version
//! - [`Version::update`] writes and returns the resulting version
//! - [`Session::versions`] looks versions up by time or by history
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── config         - Client configuration
//! ├── native_network - reqwest transport
//! ├── retry          - Retry policy for transport failures
//! ├── session        - Session and the shared connection
//! ├── version        - Version and Change
//! ├── tree           - Reads against one revision
//! ├── versions       - Time and history lookups
//! ├── watch          - Long-poll stream
//! └── utils          - URL building and response checks
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Verified connection to one service |
//! | [`Version`] | Immutable point in history |
//! | [`Tree`] | Configuration at one version |
//! | [`Change`] | Who changed what, and when |
//! | [`Versions`] | Versions by time or by predecessor |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Examples
//!
//! ```no_run
//! use stronghold_rs::client::{ClientConfig, Session};
//!
//! # async fn run() -> stronghold_rs::Result<()> {
//! let config = ClientConfig {
//!     max_retries: 2,
//!     retry_delay_ms: 250,
//!     ..Default::default()
//! };
//! let session = Session::connect_with_config("http://10.0.0.5:5040", config).await?;
//! let head = session.head().await?;
//! for path in head.tree().paths().await? {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
#[cfg(feature = "native")]
pub mod native_network;
pub mod retry;
mod session;
mod tree;
mod utils;
mod version;
mod versions;
mod watch;

pub use config::{ClientConfig, DEFAULT_ENDPOINT, GREETING};
pub use retry::{RetryConfig, RetryDecision, RetryPolicy, RetryState};
pub use session::Session;
pub use tree::{NextMaterialized, Tree};
pub use version::{Change, Version};
pub use versions::Versions;
pub use watch::WatchMaterialized;
