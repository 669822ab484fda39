/// Client configuration: API host, retry and polling policy, rate-limit descriptor.
use std::time::Duration;

/// Default Coinbase top-level domain.
pub const DEFAULT_DOMAIN: &str = "com";

/// REST base URL template; `{domain}` is replaced by the configured domain.
pub const REST_URL: &str = "https://api.coinbase.{domain}/api/v3";

/// User agent sent on every request.
pub const USER_AGENT: &str = concat!("coinbase-wrapped-sdk/", env!("CARGO_PKG_VERSION"));

pub const CONVERSION_RATE_EP: &str = "/exchange/assets/wrapped/pricing";
pub const WRAP_EP: &str = "/brokerage/wrapped-assets/convert";
pub const WRAP_STATUS_EP: &str = "/brokerage/wrapped-assets/conversions/{conversion_id}";

/// Limiter id attached to every REST call.
pub const RATE_LIMIT_ID: &str = "coinbase_wrapped_rest";

/// Rate-limit descriptor consumed by the HTTP execution service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub limit_id: String,
    pub limit: u32,
    pub interval: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            limit_id: RATE_LIMIT_ID.into(),
            limit: 1,
            interval: Duration::from_secs(1),
        }
    }
}

/// Retry behavior for transient HTTP failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (default: 3).
    pub max_attempts: u32,
    /// Fixed delay between attempts (default: 2s).
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Polling behavior while waiting for a conversion to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks (default: 2s).
    pub interval: Duration,
    /// Overall wait measured from the first status check (default: 60s).
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub domain: String,
    pub user_agent: String,
    pub retry: RetryPolicy,
    pub poll: PollConfig,
    pub rate_limit: RateLimit,
}

impl ClientConfig {
    /// Configuration for a specific Coinbase domain (e.g. `"com"`).
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// The REST base URL for this configuration's domain.
    pub fn rest_base(&self) -> String {
        REST_URL.replace("{domain}", &self.domain)
    }

    /// Resolve an endpoint into an absolute URL.
    ///
    /// Absolute `http(s)` URLs pass through untouched.
    pub fn rest_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        if endpoint.starts_with('/') {
            format!("{}{}", self.rest_base(), endpoint)
        } else {
            format!("{}/{}", self.rest_base(), endpoint)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.into(),
            user_agent: USER_AGENT.into(),
            retry: RetryPolicy::default(),
            poll: PollConfig::default(),
            rate_limit: RateLimit::default(),
        }
    }
}

/// Status endpoint for a single conversion.
pub fn wrap_status_endpoint(conversion_id: &str) -> String {
    WRAP_STATUS_EP.replace("{conversion_id}", conversion_id)
}
