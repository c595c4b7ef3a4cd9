//! Unified error types for mdrelay.
//!
//! Validation failures are raised before any network access. Transport
//! failures propagate unchanged; nothing in the pipeline retries.

/// Unified error types for the document pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Proxied path does not name a markdown file.
    #[error("Filetype not allowed.")]
    InvalidFileType(String),

    /// Document name contains a disallowed character or is empty.
    #[error("Illegal filename")]
    IllegalDocName(String),

    /// Upstream URL could not be built from the configured base and path.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network or connection failure, including timeouts.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status.
    #[error("UPSTREAM_STATUS: {0}")]
    UpstreamStatus(u16),

    /// HTML serialization failed.
    #[error("RENDER_FAILED: {0}")]
    Render(String),
}

impl Error {
    /// True for errors raised before any network call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidFileType(_) | Error::IllegalDocName(_) | Error::InvalidUrl(_))
    }

    /// Short machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidFileType(_) => "INVALID_FILE_TYPE",
            Error::IllegalDocName(_) => "ILLEGAL_DOC_NAME",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Transport(_) => "TRANSPORT_ERROR",
            Error::UpstreamStatus(_) => "UPSTREAM_STATUS",
            Error::Render(_) => "RENDER_FAILED",
        }
    }
}
