//! HTTP transport for the settlement service.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /invoke/:operation`: body is a JSON array of string arguments.
//! - `POST /query/:operation`: same body; responds with the stored bytes.
//! - `GET /health`: `{ "ok": true, "invoke": [...], "query": [...] }`.
//!
//! Success with a body is `200` with the bytes as `application/json`;
//! success without a body is `204`. Errors carry `{ "error": "..." }`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::service::{Service, Surface};

/// Build an axum `Router` that dispatches operations via the given service.
pub fn router<S: Send + Sync + 'static>(service: Arc<Service<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/invoke/:operation", post(invoke_handler))
        .route("/query/:operation", post(query_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:7070"`).
pub async fn serve<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "settlement service listening");
    axum::serve(listener, app).await
}

async fn health_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
) -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "invoke": service.operations(Surface::Invoke),
        "query": service.operations(Surface::Query),
    }))
}

async fn invoke_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(operation): Path<String>,
    Json(args): Json<Vec<String>>,
) -> Response {
    respond(service, Surface::Invoke, operation, args).await
}

async fn query_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(operation): Path<String>,
    Json(args): Json<Vec<String>>,
) -> Response {
    respond(service, Surface::Query, operation, args).await
}

/// Runs the operation on the blocking pool; key locks may park the thread.
async fn respond<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    surface: Surface,
    operation: String,
    args: Vec<String>,
) -> Response {
    let result =
        tokio::task::spawn_blocking(move || service.dispatch(surface, &operation, args)).await;

    match result {
        Ok(Ok(Some(bytes))) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Ok(Ok(None)) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e)) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            tracing::error!(%surface, error = %e, "operation task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "operation aborted" })),
            )
                .into_response()
        }
    }
}
