//! Unified error types for podcheck.
//!
//! Only persistence and setup failures live here. Probe-level transport
//! failures are absorbed by the probe implementation and never reach this type.

/// Unified error types for the podcheck crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Snapshot exists but could not be read or parsed.
    #[error("SNAPSHOT_LOAD: {0}")]
    SnapshotLoad(String),

    /// Updated snapshot could not be written.
    #[error("SNAPSHOT_SAVE: {0}")]
    SnapshotSave(String),

    /// URL template is missing its placeholder or scheme.
    #[error("INVALID_TEMPLATE: {0}")]
    InvalidTemplate(String),

    /// HTTP client could not be constructed.
    #[error("HTTP_CLIENT: {0}")]
    HttpClient(String),
}
