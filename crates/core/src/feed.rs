//! Feed descriptions consumed by the merge engine.
//!
//! A feed says how identifiers are generated (a bounded lookback over past
//! dates, or a single next-in-sequence frontier), how an identifier maps to
//! candidate URLs, and whether misses are cached.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Placeholder substituted with the identifier key in a [`UrlTemplate`].
pub const PLACEHOLDER: &str = "{id}";

/// Absolute http(s) URL containing at least one `{id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn parse(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if !trimmed.contains(PLACEHOLDER) {
            return Err(Error::InvalidTemplate(format!("{trimmed:?} has no {PLACEHOLDER} placeholder")));
        }
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(Error::InvalidTemplate(format!("{trimmed:?} must start with http:// or https://")));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn render(&self, key: &str) -> String {
        self.0.replace(PLACEHOLDER, key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UrlTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Second-mirror URL derived by substring substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRule {
    pub from: String,
    pub to: String,
}

impl MirrorRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    /// Replace the first occurrence of `from`. `None` if that changes nothing.
    pub fn apply(&self, url: &str) -> Option<String> {
        if self.from.is_empty() || !url.contains(&self.from) {
            return None;
        }
        let mirrored = url.replacen(&self.from, &self.to, 1);
        (mirrored != url).then_some(mirrored)
    }
}

/// How candidate identifiers are generated on each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cadence {
    /// The `days` dates before "today", most recent first, keyed `YYYY-MM-DD`.
    Lookback { days: u32 },
    /// One past the highest stored sequence number, keyed `"{label} {n}"`.
    Frontier { label: String },
}

/// Everything the engine needs to know about one feed.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub name: String,
    pub template: UrlTemplate,
    pub mirror: Option<MirrorRule>,
    pub cadence: Cadence,
    /// Store unresolved identifiers as `NotAvailable` (frozen) instead of
    /// leaving them absent to be retried on the next run.
    pub record_misses: bool,
}

impl FeedSpec {
    pub fn lookback(name: impl Into<String>, template: UrlTemplate, days: u32) -> Self {
        Self { name: name.into(), template, mirror: None, cadence: Cadence::Lookback { days }, record_misses: true }
    }

    pub fn frontier(name: impl Into<String>, template: UrlTemplate, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template,
            mirror: None,
            cadence: Cadence::Frontier { label: label.into() },
            record_misses: false,
        }
    }

    pub fn with_mirror(mut self, mirror: MirrorRule) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_record_misses(mut self, record_misses: bool) -> Self {
        self.record_misses = record_misses;
        self
    }

    /// Primary URL for `key`, followed by its mirror when one applies.
    pub fn candidate_urls(&self, key: &str) -> Vec<String> {
        let primary = self.template.render(key);
        let mirrored = self.mirror.as_ref().and_then(|m| m.apply(&primary));
        std::iter::once(primary).chain(mirrored).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITUNES: &str = "https://audio.example.com/tmp_audio/itunes1/show_{id}.mp3";

    #[test]
    fn test_template_render() {
        let template = UrlTemplate::parse(ITUNES).unwrap();
        assert_eq!(template.render("2024-03-01"), "https://audio.example.com/tmp_audio/itunes1/show_2024-03-01.mp3");
    }

    #[test]
    fn test_template_render_all_placeholders() {
        let template = UrlTemplate::parse("https://x.example.com/{id}/{id}.mp3").unwrap();
        assert_eq!(template.render("9"), "https://x.example.com/9/9.mp3");
    }

    #[test]
    fn test_template_requires_placeholder() {
        let result = UrlTemplate::parse("https://x.example.com/static.mp3");
        assert!(matches!(result, Err(Error::InvalidTemplate(_))));
    }

    #[test]
    fn test_template_requires_http_scheme() {
        assert!(UrlTemplate::parse("ftp://x.example.com/{id}.mp3").is_err());
        assert!(UrlTemplate::parse("x.example.com/{id}.mp3").is_err());
        assert!("http://x.example.com/{id}.mp3".parse::<UrlTemplate>().is_ok());
    }

    #[test]
    fn test_template_trims_whitespace() {
        let template = UrlTemplate::parse("  https://x.example.com/{id}.mp3\n").unwrap();
        assert_eq!(template.as_str(), "https://x.example.com/{id}.mp3");
    }

    #[test]
    fn test_mirror_replaces_first_occurrence_only() {
        let rule = MirrorRule::new("itunes1", "itunes2");
        assert_eq!(
            rule.apply("https://h/itunes1/a_itunes1.mp3").as_deref(),
            Some("https://h/itunes2/a_itunes1.mp3")
        );
    }

    #[test]
    fn test_mirror_no_match() {
        let rule = MirrorRule::new("itunes1", "itunes2");
        assert!(rule.apply("https://h/other/a.mp3").is_none());
        assert!(MirrorRule::new("", "x").apply("https://h/a.mp3").is_none());
        assert!(MirrorRule::new("same", "same").apply("https://h/same.mp3").is_none());
    }

    #[test]
    fn test_candidate_urls_with_mirror() {
        let feed = FeedSpec::lookback("daily", UrlTemplate::parse(ITUNES).unwrap(), 14)
            .with_mirror(MirrorRule::new("itunes1", "itunes2"));
        let urls = feed.candidate_urls("2024-03-01");
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("itunes1"));
        assert!(urls[1].contains("itunes2"));
    }

    #[test]
    fn test_candidate_urls_frontier_single() {
        let feed = FeedSpec::frontier(
            "weekly",
            UrlTemplate::parse("https://cdn.example.com/ep{id}.mp3").unwrap(),
            "Episode",
        );
        assert_eq!(feed.candidate_urls("6"), vec!["https://cdn.example.com/ep6.mp3".to_string()]);
        assert!(!feed.record_misses);
    }
}
