//! Proxy endpoint serving rewritten upstream markdown.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::error::Result;
use crate::state::AppState;

/// Create the proxy router
pub fn router() -> Router<AppState> {
    Router::new().route("/*path", get(proxy_document))
}

/// Serve an upstream markdown file, rewriting view links to this host.
async fn proxy_document(State(state): State<AppState>, Path(path): Path<String>, headers: HeaderMap) -> Result<Response> {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let target = state.config().link_target(host);

    let text = state.proxy().serve(&format!("/{path}"), &target).await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text.to_string()).into_response())
}
