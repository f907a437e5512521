//! Existence-check contract and primary/fallback resolution.

use async_trait::async_trait;

/// Answers "does this URL currently resolve to a downloadable resource?".
///
/// Implementations must not fail: an unreachable host, a TLS error or a
/// timeout is reported as `false`, the same as a 404.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Return the first candidate that exists, trying them strictly in order.
pub async fn resolve(probe: &dyn Probe, candidates: &[String]) -> Option<String> {
    for url in candidates {
        if probe.exists(url).await {
            tracing::debug!(%url, "resolved");
            return Some(url.clone());
        }
    }
    None
}
