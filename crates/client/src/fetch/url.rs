//! URL canonicalization for consistent cache keys.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("path escapes upstream base: {0}")]
    EscapesBase(String),
}

impl From<UrlError> for mdrelay_core::Error {
    fn from(err: UrlError) -> Self {
        mdrelay_core::Error::InvalidUrl(err.to_string())
    }
}

/// Canonicalize a URL string for consistent caching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Lowercase the host
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Build the canonical upstream URL for a proxied path.
///
/// `path` is appended to `base` verbatim (a leading `/` is added if missing).
/// Dot segments are resolved during parsing; a result that no longer sits
/// under `base` is rejected.
pub fn join_upstream(base: &str, path: &str) -> Result<url::Url, UrlError> {
    let base = canonicalize(base)?;
    let prefix = base.as_str().trim_end_matches('/');

    let separator = if path.starts_with('/') { "" } else { "/" };
    let joined = canonicalize(&format!("{prefix}{separator}{path}"))?;

    let inside = joined
        .as_str()
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'));
    if !inside {
        return Err(UrlError::EscapesBase(path.to_string()));
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://raw.githubusercontent.com/XXXLutz/techstack-tutorial/master";

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_requires_absolute_url() {
        assert!(matches!(canonicalize("example.com/a.md"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_canonicalize_lowercase_host_keeps_path_case() {
        let url = canonicalize("https://EXAMPLE.COM/Docs/README.md").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/Docs/README.md");
    }

    #[test]
    fn test_canonicalize_remove_fragment_preserve_query() {
        let url = canonicalize("https://example.com/a.md?raw=1#section").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("raw=1"));
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_join_upstream() {
        let url = join_upstream(BASE, "/01-node-babel/README.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/XXXLutz/techstack-tutorial/master/01-node-babel/README.md"
        );
    }

    #[test]
    fn test_join_upstream_adds_separator() {
        let url = join_upstream(BASE, "README.md").unwrap();
        assert_eq!(url.path(), "/XXXLutz/techstack-tutorial/master/README.md");
    }

    #[test]
    fn test_join_upstream_trailing_slash_base() {
        let url = join_upstream("https://example.com/docs/", "/a.md").unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/a.md");
    }

    #[test]
    fn test_join_upstream_same_key_for_equivalent_paths() {
        let a = join_upstream(BASE, "/guide/./intro.md").unwrap();
        let b = join_upstream(BASE, "/guide/intro.md").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_join_upstream_rejects_escape() {
        let result = join_upstream(BASE, "/../../other/repo/master/secret.md");
        assert!(matches!(result, Err(UrlError::EscapesBase(_))));

        let result = join_upstream(BASE, "/%2e%2e/other.md");
        assert!(matches!(result, Err(UrlError::EscapesBase(_))));
    }

    #[test]
    fn test_join_upstream_rejects_sibling_prefix() {
        let result = join_upstream("https://example.com/docs", "/../docs-private/a.md");
        assert!(matches!(result, Err(UrlError::EscapesBase(_))));
    }
}
