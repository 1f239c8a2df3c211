//! Documents and history entries as they appear on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::core::types::Revision;

/// Opaque entity tag attached to a materialized read.
///
/// The client never sends it back or compares it; callers may keep it for
/// their own conditional revalidation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityTag(String);

impl EntityTag {
    pub fn new(s: impl Into<String>) -> Self {
        EntityTag(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Effective configuration of a path, as merged by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct Materialized {
    pub document: Value,
    pub entity_tag: Option<EntityTag>,
}

impl Materialized {
    /// Look up a top-level key of the document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    #[must_use]
    pub fn into_document(self) -> Value {
        self.document
    }
}

/// Body of `GET /{revision}/change`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChangeRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub previous: Option<Revision>,
    #[serde(default, alias = "changes")]
    pub changeset: Value,
}

/// One element of the `GET /versions?last=..` listing.
#[derive(Clone, Debug, Deserialize)]
pub struct RevisionEntry {
    pub revision: Revision,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = RawTimestamp::deserialize(deserializer)?;
    let parsed = match raw {
        RawTimestamp::Seconds(secs) => DateTime::from_timestamp(secs, 0),
        RawTimestamp::Fractional(secs) => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9) as u32;
            DateTime::from_timestamp(whole as i64, nanos)
        }
        RawTimestamp::Text(text) => match text.trim().parse::<i64>() {
            Ok(secs) => DateTime::from_timestamp(secs, 0),
            Err(_) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        },
    };
    parsed.ok_or_else(|| D::Error::custom("timestamp is neither epoch seconds nor RFC 3339"))
}
