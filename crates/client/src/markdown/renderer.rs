//! Markdown to HTML rendering with title extraction.

use comrak::{Arena, Options, format_html, parse_document};
use mdrelay_core::{Error, RawDocument, RenderedDocument};

use super::{extract_title, lexer};

/// Renders markdown documents to HTML and derives their titles.
///
/// Parses once with comrak, reads the heading tokens off the tree for the
/// title, then serializes the same tree to HTML. GitHub Flavored Markdown
/// extensions are enabled: tables, strikethrough, autolinks and task lists.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    allow_raw_html: bool,
}

impl MarkdownRenderer {
    /// Creates renderer with GitHub Flavored Markdown options.
    ///
    /// Raw HTML in the source is omitted from the output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates renderer that passes raw HTML through when `allow` is set.
    pub fn with_raw_html(allow: bool) -> Self {
        Self { allow_raw_html: allow }
    }

    fn options(&self) -> Options<'static> {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;

        options.render.unsafe_ = self.allow_raw_html;

        options
    }

    /// Renders a document, deriving its title from its headings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if HTML serialization fails. Output goes to an
    /// in-memory buffer, so this does not happen in practice.
    pub fn render(&self, doc: RawDocument) -> Result<RenderedDocument, Error> {
        let options = self.options();
        let arena = Arena::new();
        let root = parse_document(&arena, &doc.text, &options);

        let tokens = lexer::tokens(root);
        let title = extract_title(&tokens);

        let mut out = Vec::with_capacity(doc.text.len() * 2);
        format_html(root, &options, &mut out).map_err(|e| Error::Render(e.to_string()))?;
        let html = String::from_utf8(out).map_err(|e| Error::Render(e.to_string()))?;

        tracing::debug!(filename = %doc.filename, tokens = tokens.len(), title = ?title, "rendered document");

        Ok(RenderedDocument { title, html, text: doc.text, filename: doc.filename })
    }
}
