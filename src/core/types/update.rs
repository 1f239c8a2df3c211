//! Write requests.
//!
//! A write names the path it targets, the data to store there, and who made
//! the change and why. All four are required; there is no partial update.

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{Result, StrongholdError};
use crate::core::path;

/// A complete write against one path.
///
/// ```
/// use serde_json::json;
/// use stronghold_rs::UpdateRequest;
///
/// let req = UpdateRequest::builder()
///     .path("/a/b")
///     .data(json!({"x": 2}))
///     .author("alice")
///     .comment("bump x")
///     .build()
///     .unwrap();
/// assert_eq!(req.author, "alice");
///
/// let missing = UpdateRequest::builder().path("/a/b").data(json!({})).build();
/// assert!(missing.is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateRequest {
    pub path: String,
    pub data: Value,
    pub author: String,
    pub comment: String,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    data: &'a Value,
    author: &'a str,
    comment: &'a str,
}

impl UpdateRequest {
    pub fn new(
        path: impl Into<String>,
        data: Value,
        author: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        UpdateRequest {
            path: path.into(),
            data,
            author: author.into(),
            comment: comment.into(),
        }
    }

    pub fn builder() -> UpdateRequestBuilder {
        UpdateRequestBuilder::default()
    }

    /// Local checks run before anything is sent.
    ///
    /// JSON `null` data counts as absent.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_null() {
            return Err(StrongholdError::MissingField("data"));
        }
        path::validate(&self.path)
    }

    /// JSON body for `POST /{revision}/update{path}`.
    pub(crate) fn to_body(&self) -> Result<Vec<u8>> {
        let body = UpdateBody {
            data: &self.data,
            author: &self.author,
            comment: &self.comment,
        };
        Ok(serde_json::to_vec(&body)?)
    }
}

/// Builder for [`UpdateRequest`]; `build` fails on the first unset field.
#[derive(Clone, Debug, Default)]
pub struct UpdateRequestBuilder {
    path: Option<String>,
    data: Option<Value>,
    author: Option<String>,
    comment: Option<String>,
}

impl UpdateRequestBuilder {
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn build(self) -> Result<UpdateRequest> {
        let request = UpdateRequest {
            path: self.path.ok_or(StrongholdError::MissingField("path"))?,
            data: self.data.ok_or(StrongholdError::MissingField("data"))?,
            author: self.author.ok_or(StrongholdError::MissingField("author"))?,
            comment: self.comment.ok_or(StrongholdError::MissingField("comment"))?,
        };
        request.validate()?;
        Ok(request)
    }
}
