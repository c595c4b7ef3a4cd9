//! Textual rewriting of upstream document-view links.
//!
//! Upstream markdown links to sibling documents through the source host's
//! browsable view URLs. Those prefixes are swapped for a base URL on this
//! server so readers stay on the proxy. No markdown parsing takes place.

/// Replaces a fixed URL prefix everywhere it occurs.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    view_prefix: String,
}

impl LinkRewriter {
    pub fn new(view_prefix: impl Into<String>) -> Self {
        Self { view_prefix: view_prefix.into() }
    }

    /// Number of prefix occurrences in `text`.
    pub fn occurrences(&self, text: &str) -> usize {
        if self.view_prefix.is_empty() {
            return 0;
        }
        text.matches(self.view_prefix.as_str()).count()
    }

    /// Replace every occurrence of the view prefix with `target`.
    ///
    /// The path after the prefix is left untouched. An empty prefix matches
    /// nothing.
    pub fn rewrite(&self, text: &str, target: &str) -> String {
        if self.view_prefix.is_empty() {
            return text.to_string();
        }
        text.replace(self.view_prefix.as_str(), target)
    }
}
