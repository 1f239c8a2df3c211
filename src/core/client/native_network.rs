use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::client::config::ClientConfig;
use crate::core::error::{Result, StrongholdError};
use crate::core::traits::StrongholdNetwork;
use crate::core::types::{Method, StrongholdRequest, StrongholdResponse};

/// reqwest-backed transport.
pub struct NativeNetwork {
    client: Client,
}

impl NativeNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a reqwest client from the session configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connection_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_idle_connections);

        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let client = builder
            .build()
            .map_err(|e| StrongholdError::Config(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl StrongholdNetwork for NativeNetwork {
    async fn fetch(&self, url: &str, request: StrongholdRequest) -> Result<StrongholdResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let target = format!("{} {}", request.method, url);

        let mut req_builder = self.client.request(method, url);
        if let Some(content_type) = &request.content_type {
            req_builder = req_builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| StrongholdError::transport(target.clone(), e))?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StrongholdError::transport(target, e))?;

        Ok(StrongholdResponse {
            status,
            headers,
            body,
        })
    }
}
