use std::env;
use std::time::Duration;

/// Default public Overpass API endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Configuration for the road-data fetcher, read once at router startup.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Overpass API endpoint URL
    pub overpass_url: String,
    /// Upstream request timeout
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RouterConfig {
    /// Builds a configuration from the `OVERPASS_URL` and
    /// `OVERPASS_TIMEOUT_MS` environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("OVERPASS_URL") {
            if !url.is_empty() {
                config.overpass_url = url;
            }
        }
        if let Some(ms) = env::var("OVERPASS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }
        config
    }
}
