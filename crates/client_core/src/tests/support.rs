//! In-process rating endpoint for client and session tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::{
    io::AsyncReadExt,
    net::TcpListener,
    sync::{Mutex, Notify},
};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedPost {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub(crate) struct RatingServerState {
    pub gets: Arc<AtomicUsize>,
    pub posts: Arc<Mutex<Vec<RecordedPost>>>,
    pub aggregate_body: Arc<Mutex<String>>,
    pub get_status: Arc<Mutex<StatusCode>>,
    pub post_status: Arc<Mutex<StatusCode>>,
    /// When set, POST handlers park until the gate is notified.
    pub post_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    pub post_received: Arc<Notify>,
}

impl RatingServerState {
    fn new(aggregate_body: &str) -> Self {
        Self {
            gets: Arc::new(AtomicUsize::new(0)),
            posts: Arc::new(Mutex::new(Vec::new())),
            aggregate_body: Arc::new(Mutex::new(aggregate_body.to_string())),
            get_status: Arc::new(Mutex::new(StatusCode::OK)),
            post_status: Arc::new(Mutex::new(StatusCode::CREATED)),
            post_gate: Arc::new(Mutex::new(None)),
            post_received: Arc::new(Notify::new()),
        }
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn set_aggregate_body(&self, body: &str) {
        *self.aggregate_body.lock().await = body.to_string();
    }

    pub async fn respond_to_gets_with(&self, status: StatusCode) {
        *self.get_status.lock().await = status;
    }

    pub async fn respond_to_posts_with(&self, status: StatusCode) {
        *self.post_status.lock().await = status;
    }

    pub async fn hold_posts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.post_gate.lock().await = Some(gate.clone());
        gate
    }
}

async fn serve_aggregate(State(state): State<RatingServerState>) -> impl IntoResponse {
    state.gets.fetch_add(1, Ordering::SeqCst);
    let body = state.aggregate_body.lock().await.clone();
    let status = *state.get_status.lock().await;
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn record_rating(
    State(state): State<RatingServerState>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .posts
        .lock()
        .await
        .push(RecordedPost { content_type, body });
    state.post_received.notify_one();

    let gate = state.post_gate.lock().await.clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
    *state.post_status.lock().await
}

pub(crate) async fn spawn_rating_server(aggregate_body: &str) -> Result<(Url, RatingServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = RatingServerState::new(aggregate_body);
    let app = Router::new()
        .route("/rating", get(serve_aggregate).post(record_rating))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/rating"))?, state))
}

/// An endpoint on a port nothing listens on.
pub(crate) fn unreachable_endpoint() -> Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{addr}/rating"))?)
}

/// Counts requests by method, then hangs up before answering any of them.
#[derive(Clone, Default)]
pub(crate) struct HangupCounts {
    pub gets: Arc<AtomicUsize>,
    pub posts: Arc<AtomicUsize>,
}

pub(crate) async fn spawn_hangup_server() -> Result<(Url, HangupCounts)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let counts = HangupCounts::default();
    let task_counts = counts.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut head = [0u8; 8];
            if socket.read(&mut head).await.unwrap_or(0) == 0 {
                continue;
            }
            if head.starts_with(b"GET") {
                task_counts.gets.fetch_add(1, Ordering::SeqCst);
            } else if head.starts_with(b"POST") {
                task_counts.posts.fetch_add(1, Ordering::SeqCst);
            }
            drop(socket);
        }
    });
    Ok((Url::parse(&format!("http://{addr}/rating"))?, counts))
}
