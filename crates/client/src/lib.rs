//! Client code for mdrelay.
//!
//! This crate provides the upstream fetch pipeline, link rewriting, document
//! loading and markdown rendering used by the server.

pub mod fetch;
pub mod loader;
pub mod markdown;
pub mod rewrite;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, Retrieve};
pub use loader::DocumentLoader;
pub use markdown::{MarkdownRenderer, Token, extract_title};
pub use rewrite::LinkRewriter;
