//! Stronghold client implementation.

pub mod client;
pub mod error;
pub mod path;
pub mod traits;
pub mod types;

pub use client::{
    Change, ClientConfig, NextMaterialized, RetryConfig, RetryDecision, RetryPolicy, RetryState,
    Session, Tree, Version, Versions, WatchMaterialized,
};
pub use error::{ErrorKind, Result, StrongholdError};
pub use path::ConfigPath;
pub use traits::StrongholdNetwork;
pub use types::{
    EntityTag, Materialized, Method, Revision, StrongholdRequest, StrongholdResponse,
    UpdateRequest,
};
