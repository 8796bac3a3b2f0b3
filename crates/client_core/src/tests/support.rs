//! In-process servers answering every request with one canned response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub body: Bytes,
}

impl SeenRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }
}

pub type SeenRequests = Arc<Mutex<Vec<SeenRequest>>>;

#[derive(Clone)]
struct CannedState {
    status: StatusCode,
    body: &'static str,
    seen: SeenRequests,
}

async fn respond(
    State(state): State<CannedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().await.push(SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        content_type: header_text(header::CONTENT_TYPE),
        cookie: header_text(header::COOKIE),
        body,
    });
    (state.status, state.body)
}

pub async fn spawn_canned_server(status: u16, body: &'static str) -> (String, SeenRequests) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = SeenRequests::default();
    let state = CannedState {
        status: StatusCode::from_u16(status).expect("status"),
        body,
        seen: seen.clone(),
    };
    let app = Router::new().fallback(respond).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), seen)
}
