//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PODCHECK_*, nested keys split on `__`)
//! 2. TOML config file (if PODCHECK_CONFIG_FILE set, or passed explicitly)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Weekday;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::feed::{FeedSpec, MirrorRule, UrlTemplate};
use crate::trigger::TriggerWindow;

mod validation;

pub use validation::ConfigError;

/// Environment variable naming a TOML config file.
pub const CONFIG_FILE_ENV: &str = "PODCHECK_CONFIG_FILE";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for probe requests.
    ///
    /// Set via PODCHECK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in milliseconds.
    ///
    /// Set via PODCHECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirect hops followed before a probe gives up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Probes in flight at once; 1 means strictly sequential.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Date-keyed feed checked over a fixed lookback window.
    #[serde(default)]
    pub lookback: LookbackConfig,

    /// Sequence-numbered feed checked one episode ahead.
    #[serde(default)]
    pub frontier: FrontierConfig,
}

/// Settings for the date-keyed feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_lookback_snapshot")]
    pub snapshot_path: PathBuf,

    /// URL with an `{id}` placeholder for the `YYYY-MM-DD` date.
    #[serde(default = "default_lookback_template")]
    pub url_template: String,

    /// Number of days before today to check.
    #[serde(default = "default_days")]
    pub days: u32,

    /// Substring swapped to build the second mirror URL. Empty disables the mirror.
    #[serde(default = "default_mirror_from")]
    pub mirror_from: String,

    #[serde(default = "default_mirror_to")]
    pub mirror_to: String,

    #[serde(default = "default_true")]
    pub record_misses: bool,
}

/// Settings for the sequence-numbered feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_frontier_snapshot")]
    pub snapshot_path: PathBuf,

    /// URL with an `{id}` placeholder for the episode number.
    #[serde(default = "default_frontier_template")]
    pub url_template: String,

    /// Identifier prefix; records are keyed `"{label} {n}"`.
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default)]
    pub record_misses: bool,

    /// When the frontier may be probed. Checked by the caller, not the engine.
    #[serde(default = "default_frontier_trigger")]
    pub trigger: TriggerWindow,
}

fn default_user_agent() -> String {
    "podcheck/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_concurrency() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_lookback_snapshot() -> PathBuf {
    PathBuf::from("statuses.json")
}

fn default_lookback_template() -> String {
    "https://itunes.radiorecord.ru/tmp_audio/itunes1/hik_-_rr_{id}.mp3".into()
}

fn default_days() -> u32 {
    14
}

fn default_mirror_from() -> String {
    "itunes1".into()
}

fn default_mirror_to() -> String {
    "itunes2".into()
}

fn default_frontier_snapshot() -> PathBuf {
    PathBuf::from("rt_statuses.json")
}

fn default_frontier_template() -> String {
    "https://cdn.radio-t.com/rt_podcast{id}.mp3".into()
}

fn default_label() -> String {
    "Episode".into()
}

fn default_frontier_trigger() -> TriggerWindow {
    TriggerWindow::at(Weekday::Sun, 11)
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: default_lookback_snapshot(),
            url_template: default_lookback_template(),
            days: default_days(),
            mirror_from: default_mirror_from(),
            mirror_to: default_mirror_to(),
            record_misses: true,
        }
    }
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: default_frontier_snapshot(),
            url_template: default_frontier_template(),
            label: default_label(),
            record_misses: false,
            trigger: default_frontier_trigger(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_concurrency: default_max_concurrency(),
            lookback: LookbackConfig::default(),
            frontier: FrontierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PODCHECK_`
    /// 2. TOML file from `PODCHECK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        Self::load_from(file.as_deref())
    }

    /// Same as [`AppConfig::load`] with an explicit TOML file taking the
    /// place of `PODCHECK_CONFIG_FILE`.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadFailed(format!("config file {} not found", path.display())));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(
            Env::prefixed("PODCHECK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

impl LookbackConfig {
    /// Engine description of this feed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the URL template is malformed.
    pub fn feed_spec(&self) -> Result<FeedSpec, ConfigError> {
        let template = UrlTemplate::parse(&self.url_template)
            .map_err(|e| ConfigError::Invalid { field: "lookback.url_template".into(), reason: e.to_string() })?;

        let mut spec = FeedSpec::lookback("lookback", template, self.days).with_record_misses(self.record_misses);
        if !self.mirror_from.is_empty() {
            spec = spec.with_mirror(MirrorRule::new(&self.mirror_from, &self.mirror_to));
        }
        Ok(spec)
    }
}

impl FrontierConfig {
    /// Engine description of this feed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the URL template is malformed.
    pub fn feed_spec(&self) -> Result<FeedSpec, ConfigError> {
        let template = UrlTemplate::parse(&self.url_template)
            .map_err(|e| ConfigError::Invalid { field: "frontier.url_template".into(), reason: e.to_string() })?;

        Ok(FeedSpec::frontier("frontier", template, self.label.trim()).with_record_misses(self.record_misses))
    }
}
