//! HTTP server implementation using Axum.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::{Router, http::Method, routing::get};
use guestbook_core::error::Result;
use guestbook_core::traits::GuestbookStore;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;

/// Shared state for the gateway server. Built once at startup.
pub struct AppState {
    pub store: Arc<dyn GuestbookStore>,
    pub start_time: Instant,
    /// Static files served for any path the API routes do not match.
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn GuestbookStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
            public_dir: PathBuf::from("public"),
        }
    }

    pub fn with_public_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.public_dir = dir.as_ref().to_path_buf();
        self
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(routes::health_check))
        .route("/lrange/{key}", get(routes::list_range))
        .route("/rpush/{key}/{value}", get(routes::list_push))
        .route("/info", get(routes::store_info))
        .route("/env", get(routes::environment))
        .fallback_service(ServeDir::new(&shared.public_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Bind `host:port` and serve until `shutdown` flips to `true`.
pub async fn start(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Guestbook listening on http://{addr}");
    serve(listener, state, shutdown).await
}

/// Serve on an already-bound listener, draining in-flight requests on shutdown.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Gateway shutting down...");
        })
        .await?;
    Ok(())
}
