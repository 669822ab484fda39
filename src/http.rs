/// HTTP execution service contract and its `reqwest` implementation.
///
/// The client never talks to the network directly. It hands a [`RestRequest`]
/// to a [`RestExecutor`], which folds query params into the URL, applies the
/// configured [`RestAuth`] when the request needs it, and returns the raw
/// [`RestResponse`].
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::auth::RestAuth;
use crate::errors::WrappedError;

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RestMethod {
    /// Uppercase method token, as used in the signature.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestMethod::Get => "GET",
            RestMethod::Post => "POST",
            RestMethod::Put => "PUT",
            RestMethod::Patch => "PATCH",
            RestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        match method {
            RestMethod::Get => reqwest::Method::GET,
            RestMethod::Post => reqwest::Method::POST,
            RestMethod::Put => reqwest::Method::PUT,
            RestMethod::Patch => reqwest::Method::PATCH,
            RestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body: structured JSON, or text that is sent byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
}

impl RequestBody {
    /// Wire form of the body. JSON is rendered compactly.
    pub fn to_text(&self) -> String {
        match self {
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Text(text) => text.clone(),
        }
    }
}

/// An outbound REST request.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: RestMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub headers: HashMap<String, String>,
    pub is_auth_required: bool,
    pub throttler_limit_id: Option<String>,
}

impl RestRequest {
    pub fn new(method: RestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            body: None,
            headers: HashMap::new(),
            is_auth_required: false,
            throttler_limit_id: None,
        }
    }

    pub fn with_params(mut self, params: &[(&str, &str)]) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_auth(mut self, is_auth_required: bool) -> Self {
        self.is_auth_required = is_auth_required;
        self
    }

    pub fn with_limit_id(mut self, limit_id: impl Into<String>) -> Self {
        self.throttler_limit_id = Some(limit_id.into());
        self
    }

    /// Move query params into the URL so the signed path matches the wire path.
    pub fn encode_params(&mut self) -> Result<(), WrappedError> {
        if self.params.is_empty() {
            return Ok(());
        }
        let mut url = Url::parse(&self.url)?;
        url.query_pairs_mut().extend_pairs(self.params.drain(..));
        self.url = url.to_string();
        Ok(())
    }

    /// Finalize a request for transmission: encode params, then sign if needed.
    pub fn prepare(mut self, auth: Option<&dyn RestAuth>) -> Result<Self, WrappedError> {
        self.encode_params()?;
        if self.is_auth_required {
            let auth = auth.ok_or_else(|| {
                WrappedError::ConfigError(format!(
                    "{} {} requires authentication but no credentials are configured",
                    self.method, self.url
                ))
            })?;
            self = auth.rest_authenticate(self);
        }
        Ok(self)
    }
}

/// A raw HTTP response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    status: u16,
    body: String,
}

impl RestResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// The HTTP execution service the client depends on.
pub trait RestExecutor: Send + Sync {
    /// Send one request and return whatever the server answered.
    ///
    /// Non-success statuses are *not* errors at this layer; only transport
    /// failures are.
    fn execute(
        &self,
        request: RestRequest,
    ) -> impl Future<Output = Result<RestResponse, WrappedError>> + Send;
}

impl<T: RestExecutor> RestExecutor for Arc<T> {
    fn execute(
        &self,
        request: RestRequest,
    ) -> impl Future<Output = Result<RestResponse, WrappedError>> + Send {
        (**self).execute(request)
    }
}

/// [`RestExecutor`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct ReqwestExecutor {
    client: Client,
    auth: Option<Arc<dyn RestAuth>>,
}

impl ReqwestExecutor {
    pub fn new(auth: Option<Arc<dyn RestAuth>>) -> Self {
        Self::with_client(Client::new(), auth)
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, TLS).
    pub fn with_client(client: Client, auth: Option<Arc<dyn RestAuth>>) -> Self {
        Self { client, auth }
    }
}

impl fmt::Debug for ReqwestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestExecutor")
            .field("auth", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

impl RestExecutor for ReqwestExecutor {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, WrappedError> {
        let request = request.prepare(self.auth.as_deref())?;
        debug!(
            "http.execute method={} url={} limit_id={:?} auth={}",
            request.method, request.url, request.throttler_limit_id, request.is_auth_required
        );

        let mut builder = self.client.request(request.method.into(), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            if !request
                .headers
                .keys()
                .any(|k| k.eq_ignore_ascii_case("content-type"))
            {
                builder = builder.header("Content-Type", "application/json");
            }
            builder = builder.body(body.to_text());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        debug!("http.execute status={} url={}", status, response.url());
        let text = response.text().await?;
        Ok(RestResponse::new(status, text))
    }
}
