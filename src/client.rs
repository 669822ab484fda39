/// High-level client for Coinbase wrapped-asset conversions.
///
/// Wraps the HTTP execution service with status classification, a bounded
/// retry loop, payload decoding, and conversion tracking.
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::time::{sleep, Instant};

use crate::auth::{CoinbaseAuth, Credentials, RestAuth};
use crate::config::{
    wrap_status_endpoint, ClientConfig, PollConfig, CONVERSION_RATE_EP, WRAP_EP,
};
use crate::decimal::WrapAmount;
use crate::errors::WrappedError;
use crate::http::{RequestBody, ReqwestExecutor, RestExecutor, RestMethod, RestRequest, RestResponse};
use crate::models::{
    conversion_id, find_pricing, ConversionOutcome, ConversionRequest, ConversionStatus, JsonMap,
};

/// Decode a response body into a JSON object.
///
/// Bodies that are not JSON become `{"data": <text>}`; JSON that is not an
/// object becomes `{"data": <value>}`.
pub fn decode_payload(response: &RestResponse) -> JsonMap {
    let value = response
        .json()
        .unwrap_or_else(|_| Value::String(response.text().to_string()));
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = JsonMap::new();
            map.insert("data".into(), other);
            map
        }
    }
}

/// The Coinbase wrapped-assets client.
#[derive(Debug)]
pub struct WrappedClient<E = ReqwestExecutor> {
    executor: E,
    config: ClientConfig,
}

impl WrappedClient<ReqwestExecutor> {
    /// Create a client for `api.coinbase.com` with default policies.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let auth: Arc<dyn RestAuth> =
            Arc::new(CoinbaseAuth::new(credentials).with_user_agent(config.user_agent.clone()));
        Self {
            executor: ReqwestExecutor::new(Some(auth)),
            config,
        }
    }
}

impl<E: RestExecutor> WrappedClient<E> {
    /// Create a client on top of any HTTP execution service.
    pub fn with_executor(executor: E, config: ClientConfig) -> Self {
        Self { executor, config }
    }

    pub fn domain(&self) -> &str {
        &self.config.domain
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    // -----------------------------------------------------------------------
    // Core call path
    // -----------------------------------------------------------------------

    /// Issue one REST call with retries on 429, 5xx and transport failures.
    ///
    /// Other 4xx statuses fail immediately. When the retry budget runs out the
    /// last failure is returned inside [`WrappedError::RetriesExhausted`].
    pub async fn rest_call(
        &self,
        endpoint: &str,
        method: RestMethod,
        params: Option<&[(&str, &str)]>,
        body: Option<Value>,
        is_auth_required: bool,
    ) -> Result<JsonMap, WrappedError> {
        let mut request = RestRequest::new(method, self.config.rest_url(endpoint))
            .with_header("User-Agent", self.config.user_agent.as_str())
            .with_limit_id(self.config.rate_limit.limit_id.as_str())
            .with_auth(is_auth_required);
        if let Some(params) = params {
            request = request.with_params(params);
        }
        if let Some(body) = body {
            request = request.with_body(RequestBody::Json(body));
        }

        let policy = self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            debug!(
                "client.rest_call endpoint={} method={} attempt={}/{}",
                endpoint, method, attempt, max_attempts
            );
            match self.send_once(request.clone()).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() => {
                    if attempt >= max_attempts {
                        warn!(
                            "client.rest_call giving up endpoint={} attempts={} error={}",
                            endpoint, attempt, err
                        );
                        return Err(WrappedError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    warn!(
                        "client.rest_call retrying endpoint={} attempt={} delay_ms={} error={}",
                        endpoint,
                        attempt,
                        policy.delay.as_millis(),
                        err
                    );
                    sleep(policy.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(
                        "client.rest_call fatal endpoint={} attempt={} error={}",
                        endpoint, attempt, err
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(&self, request: RestRequest) -> Result<JsonMap, WrappedError> {
        let response = self.executor.execute(request).await?;
        let payload = decode_payload(&response);
        match WrappedError::from_status(response.status(), response.text().to_string()) {
            Some(err) => Err(err),
            None => Ok(payload),
        }
    }

    // -----------------------------------------------------------------------
    // Pricing
    // -----------------------------------------------------------------------

    /// GET /exchange/assets/wrapped/pricing - Conversion rate for a pair.
    ///
    /// Returns `Ok(None)` when the server lists no entry for exactly this pair.
    pub async fn get_conversion_rate(
        &self,
        base_asset: &str,
        wrapped_asset: &str,
    ) -> Result<Option<f64>, WrappedError> {
        debug!(
            "client.get_conversion_rate base_asset={} wrapped_asset={}",
            base_asset, wrapped_asset
        );
        let params = [("base_asset", base_asset), ("wrapped_asset", wrapped_asset)];
        let result = self
            .rest_call(CONVERSION_RATE_EP, RestMethod::Get, Some(&params[..]), None, true)
            .await?;
        match find_pricing(&result, base_asset, wrapped_asset) {
            Some(entry) => entry.rate_f64().map(Some),
            None => {
                debug!(
                    "client.get_conversion_rate not_found base_asset={} wrapped_asset={}",
                    base_asset, wrapped_asset
                );
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Wrapping
    // -----------------------------------------------------------------------

    /// POST /brokerage/wrapped-assets/convert - Submit a wrap.
    ///
    /// With `wait` set and a `conversion_id` in the response, blocks until the
    /// conversion reaches a terminal state and stores that status payload under
    /// `final_status`. Otherwise the submission response is returned as-is.
    pub async fn submit_wrap(
        &self,
        base_asset: &str,
        wrapped_asset: &str,
        amount: &WrapAmount,
        wait: bool,
    ) -> Result<JsonMap, WrappedError> {
        debug!(
            "client.submit_wrap base_asset={} wrapped_asset={} amount={} wait={}",
            base_asset, wrapped_asset, amount, wait
        );
        let request = ConversionRequest::new(base_asset, wrapped_asset, amount.clone());
        let body = serde_json::to_value(&request)?;
        let mut response = self
            .rest_call(WRAP_EP, RestMethod::Post, None, Some(body), true)
            .await?;

        match conversion_id(&response) {
            Some(id) if wait => {
                let final_status = self.wait_for_completion(&id, &self.config.poll).await?;
                response.insert("final_status".into(), Value::Object(final_status));
            }
            Some(id) => debug!("client.submit_wrap submitted conversion_id={}", id),
            None => debug!("client.submit_wrap no conversion_id in response"),
        }
        Ok(response)
    }

    /// GET /brokerage/wrapped-assets/conversions/{id} - Current conversion status.
    pub async fn get_wrap_status(&self, conversion_id: &str) -> Result<JsonMap, WrappedError> {
        debug!("client.get_wrap_status conversion_id={}", conversion_id);
        let endpoint = wrap_status_endpoint(conversion_id);
        self.rest_call(&endpoint, RestMethod::Get, None, None, true)
            .await
    }

    /// Submit a wrap and track it to completion, returning a typed outcome.
    ///
    /// Unlike [`submit_wrap`](Self::submit_wrap), a response without a
    /// `conversion_id` is an error here, since nothing could be tracked.
    pub async fn wrap_and_wait(
        &self,
        base_asset: &str,
        wrapped_asset: &str,
        amount: &WrapAmount,
    ) -> Result<ConversionOutcome, WrappedError> {
        let submission = self
            .submit_wrap(base_asset, wrapped_asset, amount, false)
            .await?;
        let id = conversion_id(&submission).ok_or_else(|| {
            WrappedError::MissingConversionId(Value::Object(submission.clone()).to_string())
        })?;
        let final_status = self.wait_for_completion(&id, &self.config.poll).await?;
        let status = ConversionStatus::from_payload(&final_status)
            .unwrap_or_else(|| ConversionStatus::Unknown(String::new()));
        Ok(ConversionOutcome {
            conversion_id: id,
            status,
            submission,
            final_status,
        })
    }

    /// Poll a conversion until it is completed, failed or cancelled.
    ///
    /// The timeout is measured from the first status check. Dropping the
    /// returned future stops polling.
    pub async fn wait_for_completion(
        &self,
        conversion_id: &str,
        poll: &PollConfig,
    ) -> Result<JsonMap, WrappedError> {
        let start = Instant::now();
        loop {
            let status = self.get_wrap_status(conversion_id).await?;
            let state = ConversionStatus::from_payload(&status);
            if state.as_ref().is_some_and(ConversionStatus::is_terminal) {
                debug!(
                    "client.wait_for_completion conversion_id={} terminal={:?} elapsed_ms={}",
                    conversion_id,
                    state,
                    start.elapsed().as_millis()
                );
                return Ok(status);
            }
            if start.elapsed() > poll.timeout {
                warn!(
                    "client.wait_for_completion timed out conversion_id={} last_status={:?}",
                    conversion_id, state
                );
                return Err(WrappedError::PollTimeout {
                    conversion_id: conversion_id.to_string(),
                    timeout: poll.timeout,
                });
            }
            debug!(
                "client.wait_for_completion conversion_id={} status={:?} next_poll_ms={}",
                conversion_id,
                state,
                poll.interval.as_millis()
            );
            sleep(poll.interval).await;
        }
    }
}
