//! Data types exchanged with a Stronghold service.
//!
//! These are plain values with no reference to a session:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Revision`] | Opaque, server-assigned identifier of one point in history |
//! | [`StrongholdRequest`] | Method, path, query, body and expected status of one call |
//! | [`StrongholdResponse`] | Status, headers and body returned by the transport |
//! | [`UpdateRequest`] | The four required fields of a write |
//! | [`Materialized`] | A materialized document plus its optional [`EntityTag`] |
//! | [`ChangeRecord`] | Wire shape of a history entry |
//!
//! Handles that do talk to the service ([`Version`](crate::Version),
//! [`Tree`](crate::Tree), ...) live in [`client`](crate::client).

mod document;
mod request;
mod response;
mod revision;
mod update;

pub use bytes::Bytes;
pub use document::{ChangeRecord, EntityTag, Materialized, RevisionEntry};
pub use request::{Method, StrongholdRequest};
pub use response::StrongholdResponse;
pub use revision::Revision;
pub use update::{UpdateRequest, UpdateRequestBuilder};
