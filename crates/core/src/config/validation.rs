//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::feed::UrlTemplate;
use crate::merge::MAX_CONCURRENCY;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_redirects` exceeds 20
    /// - `max_concurrency` is 0 or exceeds 16
    /// - an enabled feed has a malformed template, an out-of-range window,
    ///   an empty label or a trigger hour past 23
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.max_redirects > 20 {
            return Err(invalid("max_redirects", "must not exceed 20"));
        }

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(invalid("max_concurrency", format!("must be between 1 and {MAX_CONCURRENCY}")));
        }

        if self.lookback.enabled {
            UrlTemplate::parse(&self.lookback.url_template)
                .map_err(|e| invalid("lookback.url_template", e.to_string()))?;
            if self.lookback.days == 0 || self.lookback.days > 366 {
                return Err(invalid("lookback.days", "must be between 1 and 366"));
            }
            if self.lookback.mirror_from.is_empty() && !self.lookback.mirror_to.is_empty() {
                tracing::warn!(
                    mirror_to = %self.lookback.mirror_to,
                    "lookback.mirror_to is set but mirror_from is empty; no mirror will be probed"
                );
            }
        }

        if self.frontier.enabled {
            UrlTemplate::parse(&self.frontier.url_template)
                .map_err(|e| invalid("frontier.url_template", e.to_string()))?;
            if self.frontier.label.trim().is_empty() {
                return Err(invalid("frontier.label", "must not be empty"));
            }
            if self.frontier.trigger.hour.is_some_and(|h| h > 23) {
                return Err(invalid("frontier.trigger.hour", "must be between 0 and 23"));
            }
        }

        if self.lookback.enabled
            && self.frontier.enabled
            && self.lookback.snapshot_path == self.frontier.snapshot_path
        {
            return Err(invalid("frontier.snapshot_path", "must differ from lookback.snapshot_path"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrontierConfig, LookbackConfig};
    use crate::trigger::TriggerWindow;
    use std::path::PathBuf;

    fn assert_invalid(config: &AppConfig, expected: &str) {
        let result = config.validate();
        assert!(
            matches!(&result, Err(ConfigError::Invalid { field, .. }) if field == expected),
            "expected {expected}, got {result:?}"
        );
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert_invalid(&config, "timeout_ms");
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        assert_invalid(&config, "timeout_ms");
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: "  ".into(), ..Default::default() };
        assert_invalid(&config, "user_agent");
    }

    #[test]
    fn test_validate_redirect_cap() {
        let config = AppConfig { max_redirects: 21, ..Default::default() };
        assert_invalid(&config, "max_redirects");
        let config = AppConfig { max_redirects: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        assert_invalid(&AppConfig { max_concurrency: 0, ..Default::default() }, "max_concurrency");
        assert_invalid(&AppConfig { max_concurrency: 17, ..Default::default() }, "max_concurrency");
        assert!(AppConfig { max_concurrency: 16, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_validate_lookback_days() {
        let config = AppConfig { lookback: LookbackConfig { days: 0, ..Default::default() }, ..Default::default() };
        assert_invalid(&config, "lookback.days");
        let config = AppConfig { lookback: LookbackConfig { days: 367, ..Default::default() }, ..Default::default() };
        assert_invalid(&config, "lookback.days");
    }

    #[test]
    fn test_validate_lookback_template() {
        let lookback = LookbackConfig { url_template: "https://a.example.com/fixed.mp3".into(), ..Default::default() };
        assert_invalid(&AppConfig { lookback, ..Default::default() }, "lookback.url_template");
    }

    #[test]
    fn test_disabled_feed_is_not_validated() {
        let lookback = LookbackConfig { enabled: false, days: 0, ..Default::default() };
        assert!(AppConfig { lookback, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_validate_frontier_label_and_hour() {
        let frontier = FrontierConfig { label: String::new(), ..Default::default() };
        assert_invalid(&AppConfig { frontier, ..Default::default() }, "frontier.label");

        let frontier = FrontierConfig { trigger: TriggerWindow { weekday: None, hour: Some(24) }, ..Default::default() };
        assert_invalid(&AppConfig { frontier, ..Default::default() }, "frontier.trigger.hour");
    }

    #[test]
    fn test_validate_distinct_snapshot_paths() {
        let frontier = FrontierConfig { snapshot_path: PathBuf::from("statuses.json"), ..Default::default() };
        assert_invalid(&AppConfig { frontier, ..Default::default() }, "frontier.snapshot_path");
    }
}
