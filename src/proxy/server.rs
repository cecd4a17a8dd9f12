//! Forwarding endpoint that hides the solver's location from browsers

use crate::client::{Forwarded, MarinaClient};
use crate::protocol::{ErrorBody, FORMULA_REQUIRED, INTERNAL_SERVER_ERROR, PROXY_PATH};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::de::IgnoredAny;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared, read-only state of the forwarder
pub struct ProxyState {
    client: MarinaClient,
}

/// Build the proxy's routes
pub fn router(client: MarinaClient) -> Router {
    Router::new()
        .route(PROXY_PATH, post(handle_solve))
        .with_state(Arc::new(ProxyState { client }))
}

/// Serve the proxy on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, client: MarinaClient, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Proxy listening on {}, forwarding to {}", addr, client.endpoint());

    axum::serve(listener, router(client))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Proxy on {} stopped", addr);
    Ok(())
}

async fn handle_solve(State(state): State<Arc<ProxyState>>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Proxy error: unreadable request body: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR);
        }
    };

    let Some(formula) = requested_formula(&request) else {
        return error_response(StatusCode::BAD_REQUEST, FORMULA_REQUIRED);
    };

    match state.client.forward(formula).await {
        Ok(forwarded) => pass_through(forwarded),
        Err(e) => {
            tracing::error!(endpoint = %state.client.endpoint(), "Proxy error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

/// The `formula` field, unless it is absent or falsy.
///
/// Falsy follows JavaScript: `null`, `false`, `0`, `NaN` and `""`. Any other
/// value, strings or not, is forwarded as `prop` unchanged.
fn requested_formula(request: &Value) -> Option<&Value> {
    request.get("formula").filter(|formula| is_truthy(formula))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn pass_through(forwarded: Forwarded) -> Response {
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&forwarded.body) {
        tracing::error!(status = %forwarded.status, "Proxy error: solver answered with non-JSON body: {}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR);
    }

    (
        forwarded.status,
        [(header::CONTENT_TYPE, "application/json")],
        forwarded.body,
    )
        .into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
