//! The root client handle.
//!
//! A [`Session`] is bound to one endpoint for its whole life. Construction
//! checks the endpoint and refuses to return unless it answers with the
//! Stronghold greeting, so every handle derived from a session talks to a
//! verified service.

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, OnceLock};
use url::Url;

#[cfg(feature = "native")]
use crate::core::client::native_network::NativeNetwork;
use crate::core::client::retry::{RetryConfig, RetryPolicy};
use crate::core::client::{utils, ClientConfig, Version, Versions};
use crate::core::error::{Result, StrongholdError};
use crate::core::traits::StrongholdNetwork;
use crate::core::types::{Revision, StrongholdRequest, StrongholdResponse};

struct ConnectionInner {
    network: Arc<dyn StrongholdNetwork>,
    endpoint: Url,
    config: ClientConfig,
}

/// Shared, non-owning view of a session used by versions, trees and the
/// versions directory. Every request in the crate goes through here.
#[derive(Clone)]
pub(crate) struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    fn new(network: Arc<dyn StrongholdNetwork>, endpoint: Url, config: ClientConfig) -> Self {
        Connection {
            inner: Arc::new(ConnectionInner {
                network,
                endpoint,
                config,
            }),
        }
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Send `request` under `retry`, without looking at the status.
    async fn send(
        &self,
        request: &StrongholdRequest,
        retry: RetryConfig,
    ) -> Result<StrongholdResponse> {
        let url = utils::request_url(self.endpoint(), request)?;
        let policy = RetryPolicy::new(retry).with_logging(self.config().enable_logging);

        let network = &self.inner.network;
        let url = url.as_str();
        let response = policy
            .run(move || network.fetch(url, request.clone()))
            .await?;

        tracing::debug!(
            method = request.method.as_str(),
            target = %request.target(),
            status = response.status,
            "stronghold request"
        );
        Ok(response)
    }

    /// Send an ordinary call and enforce its expected status.
    pub(crate) async fn request(&self, request: &StrongholdRequest) -> Result<StrongholdResponse> {
        let response = self.send(request, self.config().call_retry()).await?;
        utils::check_status(request, response)
    }

    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        request: &StrongholdRequest,
    ) -> Result<T> {
        let response = self.request(request).await?;
        utils::decode_json(request, &response)
    }

    pub(crate) async fn request_revision(&self, request: &StrongholdRequest) -> Result<Revision> {
        let response = self.request(request).await?;
        utils::decode_revision(request, &response)
    }

    pub(crate) fn same_endpoint(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.endpoint() == other.endpoint()
    }

    async fn handshake(&self) -> Result<()> {
        let label = format!("could not connect to {}", self.endpoint());
        let retry = self.config().connect_retry();
        let request = &StrongholdRequest::root();
        let conn = self;

        RetryPolicy::new(retry)
            .with_logging(self.config().enable_logging)
            .guard(label, move || async move {
                let response = conn.send(request, RetryConfig::no_retry()).await?;
                let body = String::from_utf8_lossy(&response.body);
                if *body == *conn.config().greeting {
                    Ok(())
                } else {
                    Err(StrongholdError::UnexpectedGreeting {
                        endpoint: conn.endpoint().to_string(),
                        received: body.into_owned(),
                    })
                }
            })
            .await
    }
}

/// A verified connection to one Stronghold service.
///
/// Cloning is cheap and clones share the transport.
#[derive(Clone)]
pub struct Session {
    conn: Connection,
    versions: OnceLock<Versions>,
}

impl Session {
    /// Connect to `endpoint` over HTTP with the default configuration.
    #[cfg(feature = "native")]
    pub async fn connect(endpoint: &str) -> Result<Self> {
        Self::connect_with_config(endpoint, ClientConfig::default()).await
    }

    /// Connect to `endpoint` over HTTP.
    #[cfg(feature = "native")]
    pub async fn connect_with_config(endpoint: &str, config: ClientConfig) -> Result<Self> {
        let network = Arc::new(NativeNetwork::from_config(&config)?);
        Self::connect_with_network(endpoint, config, network).await
    }

    /// Connect to `endpoint` through a caller-supplied transport.
    ///
    /// The endpoint must answer `GET /` with the configured greeting within
    /// `connect_retries + 1` attempts, or this fails with
    /// [`StrongholdError::ConnectionFailure`].
    pub async fn connect_with_network(
        endpoint: &str,
        config: ClientConfig,
        network: Arc<dyn StrongholdNetwork>,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            StrongholdError::Config(format!("invalid endpoint {:?}: {}", endpoint, e))
        })?;

        let conn = Connection::new(network, endpoint, config);
        conn.handshake().await?;
        tracing::info!(endpoint = %conn.endpoint(), "connected to stronghold");

        Ok(Session {
            conn,
            versions: OnceLock::new(),
        })
    }

    /// The latest version, generally what you want.
    pub async fn head(&self) -> Result<Version> {
        let request = StrongholdRequest::get(["head"]).expecting(200);
        let revision = self.conn.request_revision(&request).await?;
        Ok(Version::new(self.conn.clone(), revision))
    }

    /// Handle for a revision token obtained elsewhere. No request is made.
    pub fn version(&self, revision: impl Into<Revision>) -> Version {
        Version::new(self.conn.clone(), revision.into())
    }

    /// Time and history lookups.
    pub fn versions(&self) -> &Versions {
        self.versions.get_or_init(|| Versions::new(self.conn.clone()))
    }

    pub fn endpoint(&self) -> &Url {
        self.conn.endpoint()
    }

    pub fn config(&self) -> &ClientConfig {
        self.conn.config()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint().as_str())
            .field("config", self.config())
            .finish()
    }
}
