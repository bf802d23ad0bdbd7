//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use placeholder_proxy::{HttpServer, ProxyConfig, Shutdown};

/// One request seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub accept: Option<String>,
    pub body: Option<Value>,
}

type Responder = dyn Fn(&RecordedCall) -> (u16, String) + Send + Sync;

struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    respond: Box<Responder>,
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_mock_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&RecordedCall) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(MockState {
        calls: Mutex::new(Vec::new()),
        respond: Box::new(respond),
    });

    let app = Router::new().fallback(record_and_respond).with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

async fn record_and_respond(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = RecordedCall {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).ok(),
    };

    let (status, payload) = (state.respond)(&call);
    state.calls.lock().unwrap().push(call);

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}

pub fn post_json(id: u64) -> Value {
    json!({
        "userId": (id - 1) / 10 + 1,
        "id": id,
        "title": format!("title {}", id),
        "body": format!("body {}", id),
    })
}

pub const COMMENTS_PER_POST: u64 = 12;

pub fn comment_json(post_id: u64, n: u64) -> Value {
    let id = (post_id - 1) * COMMENTS_PER_POST + n;
    json!({
        "postId": post_id,
        "id": id,
        "name": format!("comment {}", id),
        "email": format!("user{}@example.com", id),
        "body": format!("comment body {}", id),
    })
}

/// Responder imitating the public JSONPlaceholder API with 100 posts and
/// 12 comments per post.
#[allow(dead_code)]
pub fn placeholder_api(call: &RecordedCall) -> (u16, String) {
    let segments: Vec<&str> = call.path.trim_matches('/').split('/').collect();
    match (call.method.as_str(), segments.as_slice()) {
        ("GET", ["posts"]) => {
            let posts: Vec<Value> = (1..=100).map(post_json).collect();
            (200, Value::Array(posts).to_string())
        }
        ("GET", ["posts", id]) => match id.parse::<u64>() {
            Ok(id) if (1..=100).contains(&id) => (200, post_json(id).to_string()),
            _ => (404, "{}".to_string()),
        },
        ("POST", ["posts"]) => {
            let mut created = call.body.clone().unwrap_or_else(|| json!({}));
            created["id"] = json!(101);
            (201, created.to_string())
        }
        ("PATCH", ["posts", id]) => {
            let id = id.parse::<u64>().unwrap_or(0);
            let mut updated = post_json(id.max(1));
            updated["id"] = json!(id);
            if let Some(Value::Object(fields)) = &call.body {
                for (k, v) in fields {
                    updated[k] = v.clone();
                }
            }
            (200, updated.to_string())
        }
        ("DELETE", ["posts", _]) => (200, "{}".to_string()),
        ("GET", ["comments"]) => {
            let post_id = call
                .query
                .as_deref()
                .unwrap_or("")
                .split('&')
                .find_map(|pair| pair.strip_prefix("postId="))
                .and_then(|v| v.parse::<u64>().ok());
            let comments: Vec<Value> = match post_id {
                Some(post_id) if (1..=100).contains(&post_id) => (1..=COMMENTS_PER_POST)
                    .map(|n| comment_json(post_id, n))
                    .collect(),
                _ => Vec::new(),
            };
            (200, Value::Array(comments).to_string())
        }
        _ => (404, "{}".to_string()),
    }
}

/// Start the proxy against `upstream_base_url` on an ephemeral port.
pub async fn start_proxy(upstream_base_url: &str) -> (String, Shutdown) {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = upstream_base_url.to_string();
    config.upstream.use_system_proxy = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}

/// Plain client that never routes loopback traffic through an env proxy.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
