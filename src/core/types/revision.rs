//! Revision tokens.
//!
//! Every write to a Stronghold store produces a new revision. The service
//! orders them; the client never compares two tokens for anything but
//! equality.

use std::fmt;

/// An opaque revision token.
///
/// ```
/// use stronghold_rs::types::Revision;
///
/// let r: Revision = "r1".into();
/// assert_eq!(r.as_str(), "r1");
/// assert_eq!(r.to_string(), "r1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    #[inline]
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Revision(s.into())
    }

    /// Build a token from a plain-text response body.
    ///
    /// Surrounding whitespace (a trailing newline, typically) is not part of
    /// the token.
    pub(crate) fn from_body(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Revision(trimmed.to_string()))
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Revision::new(s)
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        Revision(s)
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
