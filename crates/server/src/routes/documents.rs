//! Rendered document endpoint.
//!
//! Validates the document name, loads it and renders it to HTML. A missing
//! document renders as an empty document rather than an error.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use mdrelay_core::{DocName, RenderedDocument};

use crate::error::Result;
use crate::state::AppState;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new().route("/:docname", get(rendered_document))
}

async fn rendered_document(State(state): State<AppState>, Path(docname): Path<String>) -> Result<Json<RenderedDocument>> {
    let name = DocName::parse(&docname)?;
    let raw = state.loader().load(&name).await?;
    let rendered = state.renderer().render(raw)?;

    Ok(Json(rendered))
}
