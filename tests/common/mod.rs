//! Mock Marina solver shared by the integration tests

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use marina_sat::MarinaClient;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request the mock solver received
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockSolver {
    status: StatusCode,
    body: String,
    received: Arc<Mutex<Vec<Received>>>,
}

/// Handle to a running mock solver
pub struct SolverHandle {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl SolverHandle {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn answer(State(mock): State<MockSolver>, headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    mock.received.lock().unwrap().push(Received { content_type, body });
    (mock.status, mock.body.clone())
}

/// Start a solver that answers every `/marina` request with `status` and `body`
pub async fn spawn_solver(status: u16, body: &str) -> SolverHandle {
    let received = Arc::new(Mutex::new(Vec::new()));
    let mock = MockSolver {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        received: Arc::clone(&received),
    };
    let app = Router::new().route("/marina", post(answer)).with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SolverHandle {
        base_url: format!("http://{}", addr),
        received,
    }
}

/// Base URL of a port nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Start the proxy forwarder in front of `solver_base_url`, returning its base URL
pub async fn spawn_proxy(solver_base_url: &str) -> String {
    let client = MarinaClient::new(solver_base_url).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(marina_sat::proxy::serve(listener, client, std::future::pending()));
    format!("http://{}", addr)
}
