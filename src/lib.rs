//! stronghold_rs: async client for the Stronghold configuration store.
//!
//! Stronghold keeps configuration as JSON documents attached to slash-delimited
//! paths. Every write produces a new immutable revision; reads are always made
//! against one revision, and the service overlays ancestor paths under
//! descendant paths to compute a path's effective ("materialized") data.
//!
//! ```no_run
//! use serde_json::json;
//! use stronghold_rs::{Session, UpdateRequest, DEFAULT_ENDPOINT};
//!
//! # async fn run() -> stronghold_rs::Result<()> {
//! let session = Session::connect(DEFAULT_ENDPOINT).await?;
//! let head = session.head().await?;
//! let current = head.tree().materialized("/service/db").await?;
//! println!("{}", current.document);
//!
//! let next = head
//!     .update(&UpdateRequest::new("/service/db", json!({"pool": 8}), "ops", "raise pool"))
//!     .await?;
//! assert_ne!(next, head);
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::client;
pub use crate::core::client::DEFAULT_ENDPOINT;
pub use crate::core::error::{ErrorKind, Result, StrongholdError};
pub use crate::core::path;
pub use crate::core::types;
pub use crate::core::{
    Change, ClientConfig, ConfigPath, EntityTag, Materialized, NextMaterialized, Revision,
    RetryConfig, Session, StrongholdNetwork, StrongholdRequest, StrongholdResponse, Tree,
    UpdateRequest, Version, Versions, WatchMaterialized,
};

#[cfg(feature = "native")]
pub use crate::core::client::native_network::NativeNetwork;
