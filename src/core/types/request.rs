//! Request parameters for one Stronghold call.

use bytes::Bytes;
use std::fmt;

/// HTTP methods used by the Stronghold protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request against the service.
///
/// `segments` are unencoded path segments appended to the session endpoint;
/// they are percent-encoded when the URL is built, so a `#` or `?` in a
/// configuration path or revision token stays part of the path. An empty
/// trailing segment gives a trailing slash. `expects` is the status the
/// operation requires; the transport does not interpret it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrongholdRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub content_type: Option<String>,
    pub expects: Option<u16>,
}

impl StrongholdRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StrongholdRequest {
            method: Method::Get,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            content_type: None,
            expects: None,
        }
    }

    /// `GET` on the endpoint itself.
    pub fn root() -> Self {
        Self::get(Vec::<String>::new())
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StrongholdRequest {
            method: Method::Post,
            ..Self::get(segments)
        }
    }

    #[must_use]
    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_json_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self.content_type = Some("application/json".to_string());
        self
    }

    #[must_use]
    pub fn expecting(mut self, status: u16) -> Self {
        self.expects = Some(status);
        self
    }

    /// Unencoded path plus query string, as used in error messages and logs.
    #[must_use]
    pub fn target(&self) -> String {
        let path = format!("/{}", self.segments.join("/"));
        if self.query.is_empty() {
            return path;
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", path, query.join("&"))
    }
}
