//! Read access to the configuration as of one version.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::core::client::session::Connection;
use crate::core::client::watch::WatchMaterialized;
use crate::core::client::Version;
use crate::core::error::Result;
use crate::core::path::{ConfigPath, RequestPath};
use crate::core::types::{Materialized, Revision, StrongholdRequest};

/// Result of a long poll: the new materialized data and the version where it
/// first appeared.
#[derive(Clone, Debug)]
pub struct NextMaterialized {
    pub data: Value,
    pub version: Version,
}

#[derive(Deserialize)]
struct NextRecord {
    #[serde(default)]
    data: Value,
    revision: Revision,
}

/// The configuration tree at one revision.
///
/// Holds nothing but the session and the revision; every method is one request.
#[derive(Clone)]
pub struct Tree {
    conn: Connection,
    revision: Revision,
}

impl Tree {
    pub(crate) fn new(conn: Connection, revision: Revision) -> Self {
        Tree { conn, revision }
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    /// List the paths that stronghold knows about.
    pub async fn paths(&self) -> Result<BTreeSet<ConfigPath>> {
        let request =
            StrongholdRequest::get([self.revision.as_str(), "tree", "paths"]).expecting(200);
        let paths: Vec<String> = self.conn.request_json(&request).await?;
        Ok(paths
            .iter()
            .map(|p| ConfigPath::from_service(p))
            .collect())
    }

    /// Data set at exactly `path`, without anything inherited from ancestors.
    ///
    /// This is what an editor wants. To know what a service at `path` will
    /// see, use [`materialized`](Self::materialized).
    pub async fn peculiar(&self, path: &str) -> Result<Value> {
        let path = RequestPath::parse(path)?;
        let request = StrongholdRequest::get([self.revision.as_str(), "tree", "peculiar"])
            .with_segments(path.segments())
            .expecting(200);
        self.conn.request_json(&request).await
    }

    /// Effective data for `path`: its own keys laid over those of every
    /// ancestor, the deepest path winning. The merge happens on the server.
    pub async fn materialized(&self, path: &str) -> Result<Materialized> {
        let path = RequestPath::parse(path)?;
        let request = StrongholdRequest::get([self.revision.as_str(), "tree", "materialized"])
            .with_segments(path.segments())
            .expecting(200);

        let response = self.conn.request(&request).await?;
        let document = crate::core::client::utils::decode_json(&request, &response)?;
        Ok(Materialized {
            document,
            entity_tag: response.entity_tag(),
        })
    }

    /// Wait until the materialized data for `path` differs from its value at
    /// this revision.
    ///
    /// The server holds the request open for as long as it takes; no timeout
    /// applies unless `ClientConfig::request_timeout_ms` is set. Dropping the
    /// future abandons the request.
    pub async fn next_materialized(&self, path: &str) -> Result<NextMaterialized> {
        let path = RequestPath::parse(path)?;
        let request =
            StrongholdRequest::get([self.revision.as_str(), "next", "tree", "materialized"])
                .with_segments(path.segments())
                .expecting(200);

        tracing::debug!(revision = %self.revision, path = %path, "waiting for change");
        let record: NextRecord = self.conn.request_json(&request).await?;
        Ok(NextMaterialized {
            data: record.data,
            version: Version::new(self.conn.clone(), record.revision),
        })
    }

    /// Follow `path` from this revision onwards.
    ///
    /// Each item is the result of one [`next_materialized`](Self::next_materialized)
    /// call made from the version the previous item reported. The stream ends
    /// after the first error.
    pub fn watch_materialized(&self, path: &str) -> Result<WatchMaterialized> {
        let path = RequestPath::parse(path)?;
        Ok(WatchMaterialized::new(self.clone(), path))
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tree").field(&self.revision.as_str()).finish()
    }
}
