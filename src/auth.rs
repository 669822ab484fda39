/// Request authentication for Coinbase REST endpoints.
///
/// Every authenticated request carries an HMAC-SHA256 signature over
/// `timestamp + METHOD + path[?query] + payload`, hex encoded. The signed
/// payload bytes are exactly the bytes transmitted as the request body.
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use log::debug;
use sha2::Sha256;
use url::Url;

use crate::config::USER_AGENT;
use crate::errors::WrappedError;
use crate::http::{RequestBody, RestMethod, RestRequest};

type HmacSha256 = Hmac<Sha256>;

pub const CB_ACCESS_KEY: &str = "CB-ACCESS-KEY";
pub const CB_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";
pub const CB_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Environment variable holding the API key for [`Credentials::from_env`].
pub const API_KEY_ENV: &str = "COINBASE_API_KEY";
/// Environment variable holding the API secret for [`Credentials::from_env`].
pub const API_SECRET_ENV: &str = "COINBASE_API_SECRET";

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Source of the signing timestamp, in whole seconds since the Unix epoch.
pub trait TimeProvider: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall-clock time provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A time provider pinned to one instant. Useful for reproducible signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimeProvider(pub u64);

impl TimeProvider for FixedTimeProvider {
    fn now_secs(&self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// API key plus a keyed HMAC derived from the API secret.
///
/// The secret itself is never stored in clear or transmitted.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    mac: HmacSha256,
}

impl Credentials {
    /// Build credentials from an API key and the raw secret bytes.
    ///
    /// HMAC accepts secrets of any length, including empty ones.
    pub fn new(api_key: impl Into<String>, api_secret: impl AsRef<[u8]>) -> Self {
        let mac = HmacSha256::new_from_slice(api_secret.as_ref())
            .expect("HMAC-SHA256 accepts keys of any length");
        Self {
            api_key: api_key.into(),
            mac,
        }
    }

    /// Load credentials from `COINBASE_API_KEY` / `COINBASE_API_SECRET`.
    pub fn from_env() -> Result<Self, WrappedError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| WrappedError::ConfigError(format!("{API_KEY_ENV} is not set")))?;
        let api_secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| WrappedError::ConfigError(format!("{API_SECRET_ENV} is not set")))?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Lowercase hex HMAC-SHA256 of `message` keyed by the API secret.
    pub fn sign(&self, message: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Signing primitives
// ---------------------------------------------------------------------------

/// The body text that participates in the signature, if any.
///
/// Only POST and PUT bodies are signed; everything else signs an empty payload.
pub fn signing_payload(request: &RestRequest) -> Option<String> {
    match (request.method, &request.body) {
        (RestMethod::Post | RestMethod::Put, Some(body)) => Some(body.to_text()),
        _ => None,
    }
}

/// Path plus verbatim query string of `url`. Unparseable URLs yield `""`.
pub fn request_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", parsed.path(), query),
            _ => parsed.path().to_string(),
        },
        Err(_) => String::new(),
    }
}

/// Concatenate the signed message. No separators.
pub fn signing_message(timestamp: &str, method: RestMethod, path: &str, payload: &str) -> String {
    format!("{timestamp}{}{path}{payload}", method.as_str())
}

// ---------------------------------------------------------------------------
// Auth capability
// ---------------------------------------------------------------------------

/// Outbound WebSocket message.
#[derive(Debug, Clone, PartialEq)]
pub struct WsRequest {
    pub payload: serde_json::Value,
}

/// Anything that can authenticate outbound requests.
pub trait RestAuth: Send + Sync {
    /// Attach authentication to a REST request. Never fails; the server is the
    /// authority on whether the signature is valid.
    fn rest_authenticate(&self, request: RestRequest) -> RestRequest;

    /// Attach authentication to a WebSocket message. Pass-through by default.
    fn ws_authenticate(&self, request: WsRequest) -> WsRequest {
        request
    }
}

/// HMAC signer for Coinbase API-key authentication.
#[derive(Clone)]
pub struct CoinbaseAuth {
    credentials: Credentials,
    time_provider: Arc<dyn TimeProvider>,
    user_agent: String,
}

impl CoinbaseAuth {
    /// Signer using the system clock.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_time_provider(credentials, Arc::new(SystemTimeProvider))
    }

    /// Signer using a custom time source.
    pub fn with_time_provider(credentials: Credentials, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            credentials,
            time_provider,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Override the `User-Agent` value attached to signed requests.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl fmt::Debug for CoinbaseAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinbaseAuth")
            .field("credentials", &self.credentials)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl RestAuth for CoinbaseAuth {
    fn rest_authenticate(&self, mut request: RestRequest) -> RestRequest {
        let timestamp = self.time_provider.now_secs().to_string();
        let payload = signing_payload(&request);
        let path = request_path(&request.url);
        let message = signing_message(
            &timestamp,
            request.method,
            &path,
            payload.as_deref().unwrap_or(""),
        );
        let signature = self.credentials.sign(&message);
        debug!(
            "auth.rest_authenticate method={} path={} timestamp={} payload_len={}",
            request.method,
            path,
            timestamp,
            payload.as_ref().map_or(0, String::len)
        );

        request
            .headers
            .insert(CB_ACCESS_KEY.into(), self.credentials.api_key().into());
        request.headers.insert(CB_ACCESS_SIGN.into(), signature);
        request.headers.insert(CB_ACCESS_TIMESTAMP.into(), timestamp);
        request
            .headers
            .insert(USER_AGENT_HEADER.into(), self.user_agent.clone());

        // Transmit exactly what was signed.
        if let Some(payload) = payload {
            if matches!(request.body, Some(RequestBody::Json(_))) {
                request.body = Some(RequestBody::Text(payload));
            }
        }
        request
    }
}
