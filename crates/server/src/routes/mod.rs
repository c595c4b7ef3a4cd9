//! HTTP routes.
//!
//! - `{proxy_mount}/*path`: rewritten upstream markdown as plain text
//! - `/api/documents/:docname`: loaded and rendered document as JSON
//! - `/health`: liveness and cache size

pub mod documents;
pub mod health;
pub mod proxy;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let proxy_mount = state.config().proxy_mount.clone();

    Router::new()
        .merge(health::router())
        .nest("/api/documents", documents::router())
        .nest(&proxy_mount, proxy::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
