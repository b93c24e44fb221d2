//! API route handlers for the gateway.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::ApiError;
use super::server::AppState;

/// Two-space indented JSON with an explicit content type.
fn pretty_json<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "guestbook",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// `GET /lrange/{key}` — the whole list, read from the replica.
pub async fn list_range(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let members = state.store.read_all(&key).await?;
    pretty_json(&members)
}

/// `GET /rpush/{key}/{value}` — append on the primary, then answer like `/lrange/{key}`.
pub async fn list_push(
    State(state): State<Arc<AppState>>,
    Path((key, value)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let len = state.store.append(&key, &value).await?;
    tracing::debug!("Appended to {key} (now {len} entries)");
    list_range(State(state), Path(key)).await
}

/// `GET /info` — the store's diagnostic report, passed through unchanged.
pub async fn store_info(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let info = state.store.info().await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], info).into_response())
}

/// `GET /env` — the process environment at request time.
pub async fn environment() -> Result<Response, ApiError> {
    pretty_json(&environment_snapshot())
}

/// Current environment as a flat map. Non-UTF-8 names and values are
/// converted lossily rather than dropped.
pub fn environment_snapshot() -> BTreeMap<String, String> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}
