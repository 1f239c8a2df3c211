//! Hierarchical configuration paths.
//!
//! Stronghold addresses configuration by slash-delimited paths. Two checks
//! exist and they are deliberately different:
//!
//! - [`validate`] is strict and fallible. It runs before a path is put on the
//!   wire.
//! - [`canonicalize`] is total. It resolves any string against `/` the way a
//!   filesystem resolves an absolute path.
//!
//! ```
//! use stronghold_rs::path::{canonicalize, validate};
//!
//! assert!(validate("/a/b").is_ok());
//! assert!(validate("a/b").is_err());
//! assert_eq!(canonicalize("//a/./b/../c"), "/a/c");
//! ```

use crate::core::error::{Result, StrongholdError};
use std::fmt;

const SEPARATOR: char = '/';

/// Check that `path` is acceptable as a request path.
///
/// The empty string and `/` both name the root.
pub fn validate(path: &str) -> Result<()> {
    if !path.is_empty() && !path.starts_with(SEPARATOR) {
        return Err(StrongholdError::InvalidPath {
            path: path.to_string(),
            reason: "path should start with a forward slash",
        });
    }
    if path.len() > 1 && path.ends_with(SEPARATOR) {
        return Err(StrongholdError::InvalidPath {
            path: path.to_string(),
            reason: "path should not end with a forward slash",
        });
    }
    Ok(())
}

/// Resolve `path` against the root, collapsing repeated separators and
/// `.`/`..` segments. `..` never climbs above the root.
#[must_use]
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    out.push(SEPARATOR);
    out.push_str(&segments.join("/"));
    out
}

/// A validated, canonical configuration path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigPath(String);

impl ConfigPath {
    /// Validate `path` and store its canonical form.
    pub fn parse(path: &str) -> Result<Self> {
        validate(path)?;
        Ok(Self(canonicalize(path)))
    }

    /// The root path, `/`.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Canonicalize a path reported by the service.
    ///
    /// Paths coming back from the server are trusted; they are normalized but
    /// not rejected.
    pub(crate) fn from_service(path: &str) -> Self {
        Self(canonicalize(path))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }
}

/// A path as it goes on the wire after an operation prefix such as
/// `/{revision}/tree/peculiar`.
///
/// The path is canonical, except that the root keeps the form the caller
/// wrote: `""` adds nothing to the prefix, `/` adds a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestPath {
    path: ConfigPath,
    bare_root: bool,
}

impl RequestPath {
    pub(crate) fn parse(path: &str) -> Result<Self> {
        Ok(RequestPath {
            path: ConfigPath::parse(path)?,
            bare_root: path.is_empty(),
        })
    }

    pub(crate) fn config_path(&self) -> &ConfigPath {
        &self.path
    }

    /// The canonical string, or `""` for a root written as `""`.
    pub(crate) fn as_str(&self) -> &str {
        if self.bare_root {
            ""
        } else {
            self.path.as_str()
        }
    }

    /// Unencoded segments appended to the operation prefix.
    pub(crate) fn segments(&self) -> Vec<String> {
        if self.bare_root {
            return Vec::new();
        }
        self.path.0[1..].split(SEPARATOR).map(str::to_string).collect()
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path.as_str())
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ConfigPath {
    type Err = StrongholdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ConfigPath {
    type Error = StrongholdError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConfigPath {
    type Error = StrongholdError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl TryFrom<&String> for ConfigPath {
    type Error = StrongholdError;

    fn try_from(s: &String) -> Result<Self> {
        Self::parse(s)
    }
}
