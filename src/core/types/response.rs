//! Responses returned by a transport.

use bytes::Bytes;
use std::collections::BTreeMap;

use crate::core::types::EntityTag;

/// Status, headers and body of one HTTP exchange.
#[derive(Clone, Debug)]
pub struct StrongholdResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl StrongholdResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        StrongholdResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `ETag` header, if the service sent one.
    pub fn entity_tag(&self) -> Option<EntityTag> {
        self.header("etag").map(EntityTag::new)
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
