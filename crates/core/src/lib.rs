//! Core types and shared functionality for podcheck.
//!
//! This crate provides:
//! - Snapshot records and the JSON snapshot store
//! - The probe contract and primary/fallback resolution
//! - The merge engine that folds new probe results into a snapshot
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod feed;
pub mod merge;
pub mod probe;
pub mod record;
pub mod store;
pub mod trigger;

pub use config::{AppConfig, ConfigError, FrontierConfig, LookbackConfig};
pub use error::Error;
pub use feed::{Cadence, FeedSpec, MirrorRule, UrlTemplate};
pub use merge::{MergeEngine, MergeOutcome};
pub use probe::{Probe, resolve};
pub use record::{Record, Status};
pub use store::SnapshotStore;
pub use trigger::TriggerWindow;
