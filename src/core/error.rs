//! Error types for Stronghold client operations.
//!
//! This module defines every failure a [`Session`](crate::Session) and the
//! handles derived from it can report. The [`Result`] alias is used throughout
//! the crate.
//!
//! # Error Categories
//!
//! | Kind | Variants | Retried | Network call made |
//! |------|----------|---------|-------------------|
//! | Validation | `InvalidPath`, `MissingField`, `InvalidArgument` | No | Never |
//! | Transport | `Transport` | Yes, per [`RetryConfig`](crate::RetryConfig) | Yes |
//! | Connection | `ConnectionFailure`, `UnexpectedGreeting` | Handshake only | Yes |
//! | Protocol | `Protocol` | No | Yes |
//! | NotFound | `NotFound` | No | Yes |
//! | Decode | `Decode`, `Json` | No | Yes |
//! | Config | `Config` | No | Never |
//!
//! # Examples
//!
//! ```
//! use stronghold_rs::{ErrorKind, StrongholdError};
//!
//! let err = StrongholdError::MissingField("author");
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert!(!err.is_retryable());
//! assert!(err.to_string().contains("author"));
//! ```

use thiserror::Error;

/// Result type for Stronghold operations.
pub type Result<T> = std::result::Result<T, StrongholdError>;

/// Boxed error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`StrongholdError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller-supplied argument broke a documented contract.
    Validation,
    /// Failure below the HTTP layer (refused, reset, timed out).
    Transport,
    /// The endpoint could not be established as a Stronghold service.
    Connection,
    /// A response arrived with a status other than the expected one.
    Protocol,
    /// The service has no such revision, path or entity.
    NotFound,
    /// A response body could not be decoded.
    Decode,
    /// Invalid client configuration.
    Config,
}

/// Errors that can occur while talking to a Stronghold service.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StrongholdError {
    /// A path failed validation before any request was sent.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected path, as supplied.
        path: String,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A required field of a request was not supplied.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// An argument was of the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network failure below the HTTP layer.
    ///
    /// These are the only errors the retry policy retries.
    #[error("transport error on {target}: {source}")]
    Transport {
        /// Method and URL of the request that failed.
        target: String,
        /// Underlying transport error.
        #[source]
        source: BoxError,
    },

    /// The session could not be established.
    ///
    /// Wraps the last error seen while probing the endpoint.
    #[error("{label}: {source}")]
    ConnectionFailure {
        /// Human readable description, e.g. `could not connect to <endpoint>`.
        label: String,
        /// What went wrong on the final attempt.
        #[source]
        source: Box<StrongholdError>,
    },

    /// The endpoint answered the handshake with something other than the greeting.
    #[error("{endpoint} is not stronghold (greeting was {received:?})")]
    UnexpectedGreeting {
        /// Endpoint that was contacted.
        endpoint: String,
        /// Body the endpoint sent back.
        received: String,
    },

    /// The service answered with an unexpected status code.
    #[error("{method} {target}: expected status {expected}, got {status}")]
    Protocol {
        /// HTTP method of the request.
        method: &'static str,
        /// Path and query of the request.
        target: String,
        /// Status the operation requires.
        expected: u16,
        /// Status actually received.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// The service reported that the requested entity does not exist.
    #[error("not found: {target}")]
    NotFound {
        /// Path and query of the request.
        target: String,
    },

    /// A response body did not have the expected shape.
    #[error("could not decode response from {target}: {reason}")]
    Decode {
        /// Path and query of the request.
        target: String,
        /// Decoder message.
        reason: String,
    },

    /// A request body could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The client was configured with invalid values.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StrongholdError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrongholdError::InvalidPath { .. }
            | StrongholdError::MissingField(_)
            | StrongholdError::InvalidArgument(_) => ErrorKind::Validation,
            StrongholdError::Transport { .. } => ErrorKind::Transport,
            StrongholdError::ConnectionFailure { .. }
            | StrongholdError::UnexpectedGreeting { .. } => ErrorKind::Connection,
            StrongholdError::Protocol { .. } => ErrorKind::Protocol,
            StrongholdError::NotFound { .. } => ErrorKind::NotFound,
            StrongholdError::Decode { .. } | StrongholdError::Json(_) => ErrorKind::Decode,
            StrongholdError::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Only transport failures are. A status mismatch means the client and the
    /// service disagree about the contract, and repeating the call will not
    /// change that.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, StrongholdError::Transport { .. })
    }

    /// Build a [`Transport`](Self::Transport) error. For use by
    /// [`StrongholdNetwork`](crate::StrongholdNetwork) implementations.
    pub fn transport(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StrongholdError::Transport {
            target: target.into(),
            source: source.into(),
        }
    }

    pub(crate) fn decode(target: impl Into<String>, reason: impl ToString) -> Self {
        StrongholdError::Decode {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}
