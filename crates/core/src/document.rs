//! Document types shared by the loader, renderer and server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Characters a document name may not contain.
const DISALLOWED_CHARS: [char; 5] = ['~', '.', ':', '/', '\\'];

/// A validated document identifier.
///
/// Can only be built through [`DocName::parse`], so holding one proves the
/// name is free of path and scheme separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocName(String);

impl DocName {
    /// Validate a raw document name.
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalDocName` if the name is empty or contains any of
    /// `~ . : / \`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() || raw.contains(DISALLOWED_CHARS) {
            return Err(Error::IllegalDocName(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the document is stored under (`{name}.md`).
    pub fn filename(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl fmt::Display for DocName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Markdown source as retrieved by the document loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    pub filename: String,
}

impl RawDocument {
    /// Placeholder for a document the source reported as missing.
    pub fn empty(name: &DocName) -> Self {
        Self { text: String::new(), filename: name.filename() }
    }
}

/// A document ready for display.
///
/// This field set is the contract with the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub title: Option<String>,
    pub html: String,
    pub text: String,
    pub filename: String,
}
