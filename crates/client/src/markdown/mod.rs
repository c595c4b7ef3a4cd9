//! Markdown rendering for loaded documents.
//!
//! A document is parsed once into a comrak tree. The tree is flattened into
//! block [`Token`]s for title selection and serialized to HTML for display.

mod lexer;
mod renderer;
mod title;

pub use lexer::{Token, tokens};
pub use renderer::MarkdownRenderer;
pub use title::extract_title;
