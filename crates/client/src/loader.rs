//! Retrieval of named markdown documents.
//!
//! A document the source does not have (any non-success status) loads as an
//! empty document instead of an error. Transport failures propagate.

use std::sync::Arc;

use mdrelay_core::{DocName, Error, RawDocument};
use url::Url;

use crate::fetch::{Retrieve, canonicalize};

/// Loads `{base}/{name}.md` through a [`Retrieve`] implementation.
#[derive(Clone)]
pub struct DocumentLoader {
    retriever: Arc<dyn Retrieve>,
    base: Url,
}

impl DocumentLoader {
    /// Create a loader rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `base_url` is not an http(s) URL.
    pub fn new(retriever: Arc<dyn Retrieve>, base_url: &str) -> Result<Self, Error> {
        let base = canonicalize(base_url)?;
        Ok(Self { retriever, base })
    }

    /// URL the document named `name` is retrieved from.
    pub fn document_url(&self, name: &DocName) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always accept path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&name.filename());
        }
        url
    }

    /// Retrieve the document named `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the retrieval itself fails. A missing
    /// document is not an error.
    pub async fn load(&self, name: &DocName) -> Result<RawDocument, Error> {
        let url = self.document_url(name);
        let response = self.retriever.get(&url).await?;

        if !response.is_success() {
            tracing::info!(url = %response.url, status = response.status.as_u16(), "document not found, loading empty");
            return Ok(RawDocument::empty(name));
        }

        Ok(RawDocument { text: response.text(), filename: name.filename() })
    }
}
