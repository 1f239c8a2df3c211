//! Looking up versions by time and by history.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::core::client::session::Connection;
use crate::core::client::Version;
use crate::core::error::{Result, StrongholdError};
use crate::core::types::{RevisionEntry, StrongholdRequest};

/// Directory of all versions known to one session.
#[derive(Clone)]
pub struct Versions {
    conn: Connection,
}

impl Versions {
    pub(crate) fn new(conn: Connection) -> Self {
        Versions { conn }
    }

    /// The version that was current at `instant`.
    ///
    /// The instant is sent with second precision.
    pub async fn at(&self, instant: impl Into<DateTime<Utc>>) -> Result<Version> {
        let instant = instant.into();
        let request = StrongholdRequest::get(["versions"])
            .with_query("at", instant.timestamp())
            .expecting(200);
        let revision = self.conn.request_revision(&request).await?;
        Ok(Version::new(self.conn.clone(), revision))
    }

    /// Up to `n` versions strictly older than `version`, newest first.
    ///
    /// `version` must come from the same endpoint as this directory.
    pub async fn before(&self, version: &Version, n: usize) -> Result<Vec<Version>> {
        if !self.conn.same_endpoint(version.conn()) {
            return Err(StrongholdError::InvalidArgument(format!(
                "version {} belongs to {}, not {}",
                version.revision(),
                version.conn().endpoint(),
                self.conn.endpoint()
            )));
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let request = StrongholdRequest::get(["versions"])
            .with_query("last", version.revision())
            .with_query("size", n)
            .expecting(200);
        let entries: Vec<RevisionEntry> = self.conn.request_json(&request).await?;

        Ok(entries
            .into_iter()
            .filter(|entry| &entry.revision != version.revision())
            .take(n)
            .map(|entry| Version::new(self.conn.clone(), entry.revision))
            .collect())
    }
}

impl fmt::Debug for Versions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Versions")
            .field("endpoint", &self.conn.endpoint().as_str())
            .finish()
    }
}
