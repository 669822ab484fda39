/// Unit tests for configuration defaults, URL resolution, and error classification.
use std::time::Duration;

use coinbase_wrapped::config::*;
use coinbase_wrapped::WrappedError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_rest_url_with_relative_path() {
    let config = ClientConfig::default();
    assert_eq!(
        config.rest_url(CONVERSION_RATE_EP),
        "https://api.coinbase.com/api/v3/exchange/assets/wrapped/pricing"
    );
    assert_eq!(
        config.rest_url("exchange/assets/wrapped/pricing"),
        "https://api.coinbase.com/api/v3/exchange/assets/wrapped/pricing"
    );
}

#[test]
fn test_rest_url_with_absolute_url() {
    let config = ClientConfig::for_domain("us");
    let url = "https://api.coinbase.com/api/v3/custom";
    assert_eq!(config.rest_url(url), url);
    assert_eq!(config.rest_base(), "https://api.coinbase.us/api/v3");
}

#[test]
fn test_status_endpoint_substitutes_id() {
    assert_eq!(
        wrap_status_endpoint("conv-123"),
        "/brokerage/wrapped-assets/conversions/conv-123"
    );
}

#[test]
fn test_defaults_match_published_limits() {
    let config = ClientConfig::default();
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay, Duration::from_secs(2));
    assert_eq!(config.poll.interval, Duration::from_secs(2));
    assert_eq!(config.poll.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit.limit, 1);
    assert_eq!(config.rate_limit.limit_id, RATE_LIMIT_ID);
    assert!(config.user_agent.starts_with("coinbase-wrapped-sdk/"));
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

#[test]
fn test_throttling_and_server_errors_are_retryable() {
    for status in [429u16, 500, 502, 503, 599] {
        let err = WrappedError::from_status(status, String::new()).unwrap();
        assert!(err.is_retryable(), "status {status} should be retryable");
    }
}

#[test]
fn test_client_errors_are_fatal() {
    for status in [400u16, 401, 403, 404, 422, 499] {
        let err = WrappedError::from_status(status, String::new()).unwrap();
        assert!(!err.is_retryable(), "status {status} should be fatal");
        assert_eq!(err.status(), Some(status));
    }
}

#[test]
fn test_success_and_redirect_range_is_not_an_error() {
    for status in [200u16, 201, 204, 301, 399] {
        assert!(WrappedError::from_status(status, String::new()).is_none());
    }
}

#[test]
fn test_exhausted_retries_report_last_status() {
    let err = WrappedError::RetriesExhausted {
        attempts: 3,
        last: Box::new(WrappedError::RetryableStatus {
            status: 503,
            body: "unavailable".into(),
        }),
    };
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_retryable());
}

#[test]
fn test_config_errors_are_not_retryable() {
    let err = WrappedError::ConfigError("bad header".into());
    assert!(!err.is_retryable());
    assert_eq!(err.status(), None);
}
