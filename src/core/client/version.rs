//! Immutable versions and their history entries.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use tokio::sync::OnceCell;

use crate::core::client::session::Connection;
use crate::core::client::Tree;
use crate::core::error::{Result, StrongholdError};
use crate::core::path::RequestPath;
use crate::core::types::{ChangeRecord, Revision, StrongholdRequest, UpdateRequest};

/// One point in the store's history.
///
/// A `Version` never changes. Writing through it returns a different
/// `Version`; the tree and change it exposes are fetched at most once and then
/// kept. Two handles with the same revision token compare equal.
#[derive(Clone)]
pub struct Version {
    conn: Connection,
    revision: Revision,
    tree: OnceLock<Tree>,
    change: OnceCell<Change>,
}

impl Version {
    pub(crate) fn new(conn: Connection, revision: Revision) -> Self {
        Version {
            conn,
            revision,
            tree: OnceLock::new(),
            change: OnceCell::new(),
        }
    }

    #[inline]
    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The configuration tree as of this version. No request is made.
    pub fn tree(&self) -> &Tree {
        self.tree
            .get_or_init(|| Tree::new(self.conn.clone(), self.revision.clone()))
    }

    /// The history entry that produced this version.
    ///
    /// Fails with [`NotFound`](crate::StrongholdError::NotFound) when the
    /// service has no change for this revision, e.g. for the first version of
    /// a store. A successful fetch is cached on this handle.
    pub async fn change(&self) -> Result<&Change> {
        self.change
            .get_or_try_init(|| async {
                let request =
                    StrongholdRequest::get([self.revision.as_str(), "change"]).expecting(200);
                let record: ChangeRecord = self.conn.request_json(&request).await?;
                Ok::<_, StrongholdError>(Change::from_record(self.conn.clone(), record))
            })
            .await
    }

    /// Write `request.data` at `request.path` on top of this version.
    ///
    /// The request is checked locally first; an invalid path or `null` data
    /// fails without touching the network.
    pub async fn update(&self, request: &UpdateRequest) -> Result<Version> {
        request.validate()?;
        let path = RequestPath::parse(&request.path)?;

        let http = StrongholdRequest::post([self.revision.as_str(), "update"])
            .with_segments(path.segments())
            .with_json_body(request.to_body()?)
            .expecting(200);

        let revision = self.conn.request_revision(&http).await?;
        tracing::debug!(
            from = %self.revision,
            to = %revision,
            path = %path,
            author = %request.author,
            "stronghold update"
        );
        Ok(Version::new(self.conn.clone(), revision))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.revision.hash(state);
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Version").field(&self.revision.as_str()).finish()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.revision, f)
    }
}

/// The transition that produced a [`Version`].
///
/// `previous` is kept as a bare token; [`Change::previous`] wraps it without
/// fetching anything, so history can be walked one step at a time.
#[derive(Clone)]
pub struct Change {
    conn: Connection,
    author: String,
    comment: String,
    timestamp: DateTime<Utc>,
    changeset: Value,
    previous: Option<Revision>,
}

impl Change {
    fn from_record(conn: Connection, record: ChangeRecord) -> Self {
        Change {
            conn,
            author: record.author,
            comment: record.comment,
            timestamp: record.timestamp,
            changeset: record.changeset,
            previous: record.previous,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// What was written, exactly as the service described it.
    pub fn changeset(&self) -> &Value {
        &self.changeset
    }

    pub fn previous_revision(&self) -> Option<&Revision> {
        self.previous.as_ref()
    }

    /// The version this change was applied to, if any.
    pub fn previous(&self) -> Option<Version> {
        self.previous
            .as_ref()
            .map(|r| Version::new(self.conn.clone(), r.clone()))
    }
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("author", &self.author)
            .field("comment", &self.comment)
            .field("timestamp", &self.timestamp)
            .field("changeset", &self.changeset)
            .field("previous", &self.previous)
            .finish()
    }
}
