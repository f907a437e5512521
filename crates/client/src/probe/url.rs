//! URL parsing applied before a probe request is sent.

/// Error type for probe URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a rendered template URL into a request URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an absolute http:// or https:// URL (no scheme guessing)
/// 3. Remove fragment (#...), which is never sent anyway
/// 4. Keep path and query string intact
pub fn parse_probe_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::InvalidUrl(format!("{trimmed}: missing host")));
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
