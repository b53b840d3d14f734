use std::time::Duration;

use url::Url;

use crate::error::ScraperError;

pub const DEFAULT_BASE_URL: &str = "https://cf.ro/";

const BASE_URL_ENV: &str = "ANCPI_BASE_URL";
const TIMEOUT_ENV: &str = "ANCPI_TIMEOUT_SECS";

/// Browser user agents; one is picked per session.
pub const USER_AGENTS: [&str; 10] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.1901.188 Safari/537.36 Edg/115.0.1901.188",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.199 Safari/537.36 OPR/100.0.4815.54",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 12_6_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:114.0) Gecko/20100101 Firefox/114.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; Pixel 6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_4; rv:115.0) Gecko/20100101 Firefox/115.0",
];

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: Url,
    /// Deadline for a whole request, response body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agents: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

impl PortalConfig {
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScraperError::Config(format!("base URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ScraperError::Config(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            ..Default::default()
        })
    }

    /// Defaults overridden by `ANCPI_BASE_URL` / `ANCPI_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, ScraperError> {
        let mut config = match std::env::var(BASE_URL_ENV) {
            Ok(url) => Self::new(&url)?,
            Err(_) => Self::default(),
        };

        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ScraperError::Config(format!("{}={:?}: {}", TIMEOUT_ENV, secs, e)))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agents<I, S>(mut self, user_agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_agents = user_agents.into_iter().map(Into::into).collect();
        self
    }

    /// `Referer` header value: the base URL as configured.
    pub fn referer(&self) -> &str {
        self.base_url.as_str()
    }

    /// `Origin` header value: scheme, host and port, no trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Absolute URL for `segments` below the base URL, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ScraperError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScraperError::Config(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
