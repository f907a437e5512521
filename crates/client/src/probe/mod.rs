//! HTTP existence probe.
//!
//! ### Contract
//! - `HEAD` request, redirects followed up to `max_redirects` (default 10)
//! - A URL exists iff the final response status is exactly `200 OK`
//! - Every transport failure (DNS, connect, TLS, timeout, redirect cap,
//!   malformed URL) is logged and reported as "does not exist"

pub mod error;
pub mod url;

use async_trait::async_trait;
use podcheck_core::{AppConfig, Error, Probe};
use reqwest::{Client, StatusCode, Url};
use std::time::{Duration, Instant};

pub use error::ProbeError;
pub use self::url::{UrlError, parse_probe_url};

/// Configuration for the probe client.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// User agent string (default: "podcheck/0.1")
    pub user_agent: String,

    /// Per-request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,

    /// Honour HTTP(S)_PROXY from the environment (default: true)
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            user_agent: "podcheck/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

impl From<&AppConfig> for ProbeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            use_system_proxy: true,
        }
    }
}

/// Outcome of a HEAD request that reached a server.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    /// The URL requested
    pub url: Url,
    /// The URL after redirects
    pub final_url: Url,
    /// Final HTTP status code
    pub status: StatusCode,
    /// Round-trip time in milliseconds
    pub probe_ms: u64,
}

impl HeadResponse {
    pub fn redirected(&self) -> bool {
        self.url != self.final_url
    }
}

/// reqwest-backed [`Probe`].
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http: Client,
}

impl HttpProbe {
    /// Create a new probe with the given configuration.
    pub fn new(config: ProbeConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// Issue a HEAD request and report where it ended up.
    pub async fn head(&self, url_str: &str) -> Result<HeadResponse, ProbeError> {
        let url = parse_probe_url(url_str)?;
        let start = Instant::now();

        let response = self.http.head(url.clone()).send().await?;

        let probe_ms = start.elapsed().as_millis() as u64;
        Ok(HeadResponse { url, final_url: response.url().clone(), status: response.status(), probe_ms })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.head(url).await {
            Ok(response) => {
                if response.redirected() {
                    tracing::debug!(%url, final_url = %response.final_url, "followed redirect");
                }
                let found = response.status == StatusCode::OK;
                tracing::debug!(%url, status = response.status.as_u16(), found, probe_ms = response.probe_ms, "probed");
                found
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "probe failed, treating as not available");
                false
            }
        }
    }
}
