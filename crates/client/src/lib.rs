//! Client code for podcheck.
//!
//! This crate provides the HTTP implementation of the probe contract
//! defined in `podcheck-core`.

pub mod probe;

pub use probe::{HeadResponse, HttpProbe, ProbeConfig, ProbeError, UrlError, parse_probe_url};
