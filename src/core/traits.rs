use crate::core::error::Result;
use crate::core::types::{StrongholdRequest, StrongholdResponse};
use async_trait::async_trait;

/// Abstraction for network operations.
///
/// Implementations move bytes; they do not judge status codes. A response with
/// any status is `Ok`. `Err` is reserved for failures below HTTP (refused,
/// reset, timed out) and must be [`StrongholdError::Transport`] so the retry
/// policy can recognise it.
///
/// [`StrongholdError::Transport`]: crate::StrongholdError::Transport
#[async_trait]
pub trait StrongholdNetwork: Send + Sync + 'static {
    /// Perform one request against the absolute `url`.
    async fn fetch(&self, url: &str, request: StrongholdRequest) -> Result<StrongholdResponse>;
}
