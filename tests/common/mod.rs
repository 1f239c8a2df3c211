#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stronghold_rs::client::GREETING;
use stronghold_rs::{Result, StrongholdNetwork, StrongholdRequest, StrongholdResponse};

pub const BASE_TIMESTAMP: i64 = 1_700_000_000;
pub const TIMESTAMP_STEP: i64 = 100;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct StoredRevision {
    id: String,
    timestamp: i64,
    docs: BTreeMap<String, Value>,
    change: Option<Value>,
}

struct Store {
    greeting: String,
    head_status: Option<StatusCode>,
    revisions: Vec<StoredRevision>,
    requests: Vec<String>,
}

impl Store {
    fn find(&self, rev: &str) -> Option<usize> {
        self.revisions.iter().position(|r| r.id == rev)
    }
}

fn ancestors(path: &str) -> Vec<String> {
    let mut out = vec!["/".to_string()];
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        out.push(current.clone());
    }
    out
}

fn materialize(docs: &BTreeMap<String, Value>, path: &str) -> Value {
    let mut merged = Map::new();
    for ancestor in ancestors(path) {
        if let Some(Value::Object(fields)) = docs.get(&ancestor) {
            for (k, v) in fields {
                merged.insert(k.clone(), v.clone());
            }
        }
    }
    Value::Object(merged)
}

/// In-process Stronghold lookalike.
///
/// Starts at `r1` with `/a = {"x": 0, "y": "inherited"}` and
/// `/a/b = {"x": 1}`. Revision `rN` has timestamp
/// `BASE_TIMESTAMP + (N - 1) * TIMESTAMP_STEP`.
#[derive(Clone)]
pub struct StubServer {
    store: Arc<Mutex<Store>>,
}

impl StubServer {
    pub fn new() -> Self {
        let mut docs = BTreeMap::new();
        docs.insert("/a".to_string(), json!({"x": 0, "y": "inherited"}));
        docs.insert("/a/b".to_string(), json!({"x": 1}));
        StubServer {
            store: Arc::new(Mutex::new(Store {
                greeting: GREETING.to_string(),
                head_status: None,
                revisions: vec![StoredRevision {
                    id: "r1".to_string(),
                    timestamp: BASE_TIMESTAMP,
                    docs,
                    change: None,
                }],
                requests: Vec::new(),
            })),
        }
    }

    pub fn with_greeting(self, greeting: &str) -> Self {
        self.store.lock().unwrap().greeting = greeting.to_string();
        self
    }

    pub fn fail_head_with(&self, status: StatusCode) {
        self.store.lock().unwrap().head_status = Some(status);
    }

    /// Write directly, bypassing HTTP. Returns the new revision id.
    pub fn commit(&self, path: &str, data: Value, author: &str, comment: &str) -> String {
        let mut store = self.store.lock().unwrap();
        let base = store.revisions.len() - 1;
        apply(&mut store, base, path, data, author, comment)
    }

    /// `METHOD /raw/path` of every `/{revision}/...` request, as received.
    pub fn requests(&self) -> Vec<String> {
        self.store.lock().unwrap().requests.clone()
    }

    /// Data stored at exactly `path` in the latest revision.
    pub fn stored(&self, path: &str) -> Option<Value> {
        let store = self.store.lock().unwrap();
        store.revisions.last().and_then(|r| r.docs.get(path).cloned())
    }

    pub fn revision_count(&self) -> usize {
        self.store.lock().unwrap().revisions.len()
    }

    /// Serve on an ephemeral port and return the endpoint URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/", get(greeting))
            .route("/head", get(head))
            .route("/versions", get(versions))
            .fallback(dispatch)
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

fn apply(
    store: &mut Store,
    base: usize,
    path: &str,
    data: Value,
    author: &str,
    comment: &str,
) -> String {
    let previous = store.revisions[base].id.clone();
    let mut changeset = Map::new();
    changeset.insert(path.to_string(), data.clone());
    let mut docs = store.revisions[base].docs.clone();
    docs.insert(path.to_string(), data.clone());

    let index = store.revisions.len();
    let id = format!("r{}", index + 1);
    let timestamp = BASE_TIMESTAMP + index as i64 * TIMESTAMP_STEP;
    store.revisions.push(StoredRevision {
        id: id.clone(),
        timestamp,
        docs,
        change: Some(json!({
            "author": author,
            "comment": comment,
            "timestamp": timestamp,
            "previous": previous,
            "changeset": changeset,
        })),
    });
    id
}

async fn greeting(State(stub): State<StubServer>) -> String {
    stub.store.lock().unwrap().greeting.clone()
}

async fn head(State(stub): State<StubServer>) -> Response {
    let store = stub.store.lock().unwrap();
    if let Some(status) = store.head_status {
        return (status, "head unavailable").into_response();
    }
    match store.revisions.last() {
        Some(rev) => rev.id.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn change(stub: &StubServer, rev: &str) -> Response {
    let store = stub.store.lock().unwrap();
    match store.find(rev).and_then(|i| store.revisions[i].change.clone()) {
        Some(change) => Json(change).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn paths(stub: &StubServer, rev: &str) -> Response {
    let store = stub.store.lock().unwrap();
    match store.find(rev) {
        Some(i) => {
            let keys: Vec<&String> = store.revisions[i].docs.keys().collect();
            Json(json!(keys)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn peculiar(stub: &StubServer, rev: &str, path: &str) -> Response {
    let store = stub.store.lock().unwrap();
    match store.find(rev) {
        Some(i) => {
            let doc = store.revisions[i]
                .docs
                .get(path)
                .cloned()
                .unwrap_or_else(|| json!({}));
            Json(doc).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn materialized(stub: &StubServer, rev: &str, path: &str) -> Response {
    let store = stub.store.lock().unwrap();
    match store.find(rev) {
        Some(i) => {
            let etag = format!("\"{}:{}\"", rev, path);
            let doc = materialize(&store.revisions[i].docs, path);
            ([(header::ETAG, etag)], Json(doc)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn next_materialized(stub: &StubServer, rev: &str, path: &str) -> Response {
    loop {
        {
            let store = stub.store.lock().unwrap();
            let Some(start) = store.find(rev) else {
                return StatusCode::NOT_FOUND.into_response();
            };
            let current = materialize(&store.revisions[start].docs, path);
            for later in &store.revisions[start + 1..] {
                let data = materialize(&later.docs, path);
                if data != current {
                    return Json(json!({ "data": data, "revision": later.id })).into_response();
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[derive(Deserialize)]
struct UpdateBody {
    data: Value,
    author: String,
    comment: String,
}

fn update(stub: &StubServer, rev: &str, path: &str, body: &[u8]) -> Response {
    let Ok(body) = serde_json::from_slice::<UpdateBody>(body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut store = stub.store.lock().unwrap();
    match store.find(rev) {
        Some(base) => apply(
            &mut store,
            base,
            path,
            body.data,
            &body.author,
            &body.comment,
        )
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Configuration path named by the segments after an operation prefix.
/// No segments and a single empty segment both name the root.
fn config_path(tail: &[&str]) -> String {
    format!("/{}", tail.join("/"))
}

/// Every `/{revision}/...` route. Segments are percent-decoded one at a time,
/// so an encoded `/` stays inside its segment.
async fn dispatch(
    State(stub): State<StubServer>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    stub.store
        .lock()
        .unwrap()
        .requests
        .push(format!("{} {}", method, uri.path()));

    let decoded: Vec<String> = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    let Some((rev, rest)) = decoded.split_first() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    match (method.as_str(), rest.as_slice()) {
        ("GET", ["change"]) => change(&stub, rev),
        ("GET", ["tree", "paths"]) => paths(&stub, rev),
        ("GET", ["tree", "peculiar", tail @ ..]) => peculiar(&stub, rev, &config_path(tail)),
        ("GET", ["tree", "materialized", tail @ ..]) => {
            materialized(&stub, rev, &config_path(tail))
        }
        ("GET", ["next", "tree", "materialized", tail @ ..]) => {
            next_materialized(&stub, rev, &config_path(tail)).await
        }
        ("POST", ["update", tail @ ..]) => update(&stub, rev, &config_path(tail), &body),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn versions(
    State(stub): State<StubServer>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = stub.store.lock().unwrap();

    if let Some(at) = params.get("at") {
        let Ok(at) = at.parse::<i64>() else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        return match store.revisions.iter().rev().find(|r| r.timestamp <= at) {
            Some(rev) => rev.id.clone().into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }

    let (Some(last), Some(size)) = (params.get("last"), params.get("size")) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Ok(size) = size.parse::<usize>() else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(anchor) = store.find(last) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // The anchor is echoed back first, followed by up to `size` predecessors.
    let entries: Vec<Value> = store.revisions[..=anchor]
        .iter()
        .rev()
        .take(size + 1)
        .map(|r| json!({ "revision": r.id }))
        .collect();
    Json(json!(entries)).into_response()
}

type Responder = dyn Fn(&str, &StrongholdRequest) -> Result<StrongholdResponse> + Send + Sync;

/// Transport double that answers from a closure and records every call.
pub struct ScriptedNetwork {
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    responder: Box<Responder>,
}

impl ScriptedNetwork {
    pub fn new(
        responder: impl Fn(&str, &StrongholdRequest) -> Result<StrongholdResponse>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(ScriptedNetwork {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Refuses every connection.
    pub fn refusing() -> Arc<Self> {
        Self::new(|url, _| Err(refused(url)))
    }

    /// Greets correctly, then answers everything else with `responder`.
    pub fn greeting_then(
        responder: impl Fn(&str, &StrongholdRequest) -> Result<StrongholdResponse>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Self::new(move |url, request| {
            if request.segments.is_empty() {
                Ok(StrongholdResponse::new(200, GREETING))
            } else {
                responder(url, request)
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

pub fn refused(url: &str) -> stronghold_rs::StrongholdError {
    stronghold_rs::StrongholdError::transport(
        format!("GET {}", url),
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
    )
}

#[async_trait::async_trait]
impl StrongholdNetwork for ScriptedNetwork {
    async fn fetch(&self, url: &str, request: StrongholdRequest) -> Result<StrongholdResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        (self.responder)(url, &request)
    }
}
