//! Utility functions for the Stronghold client.

use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::core::error::{Result, StrongholdError};
use crate::core::types::{Revision, StrongholdRequest, StrongholdResponse};

pub fn is_not_found_status(status: u16) -> bool {
    status == 404
}

/// Absolute URL for `request` under `endpoint`.
///
/// The endpoint's own path, if any, is kept as a prefix. Each segment is
/// percent-encoded on its own, so reserved characters never turn into a query
/// or fragment.
pub fn request_url(endpoint: &Url, request: &StrongholdRequest) -> Result<Url> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);
    if !request.segments.is_empty() {
        url.path_segments_mut()
            .map_err(|()| {
                StrongholdError::Config(format!("endpoint {} cannot take a path", endpoint))
            })?
            .pop_if_empty()
            .extend(&request.segments);
    }
    if !request.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &request.query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// Compare the response status with the one the request expects.
///
/// 404 becomes [`StrongholdError::NotFound`]; any other mismatch is a
/// [`StrongholdError::Protocol`] error.
pub fn check_status(
    request: &StrongholdRequest,
    response: StrongholdResponse,
) -> Result<StrongholdResponse> {
    let Some(expected) = request.expects else {
        return Ok(response);
    };
    if response.status == expected {
        return Ok(response);
    }
    if is_not_found_status(response.status) {
        return Err(StrongholdError::NotFound {
            target: request.target(),
        });
    }
    Err(StrongholdError::Protocol {
        method: request.method.as_str(),
        target: request.target(),
        expected,
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}

pub fn decode_json<T: DeserializeOwned>(
    request: &StrongholdRequest,
    response: &StrongholdResponse,
) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| StrongholdError::decode(request.target(), e))
}

/// A plain-text body holding one revision token.
pub fn decode_revision(
    request: &StrongholdRequest,
    response: &StrongholdResponse,
) -> Result<Revision> {
    let text = response
        .body_str()
        .ok_or_else(|| StrongholdError::decode(request.target(), "body is not UTF-8"))?;
    Revision::from_body(text)
        .ok_or_else(|| StrongholdError::decode(request.target(), "empty revision token"))
}

pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
