/// Unit tests for request building and response decoding.
use serde_json::{json, Value};

use coinbase_wrapped::client::decode_payload;
use coinbase_wrapped::http::*;
use coinbase_wrapped::WrappedError;

#[test]
fn test_encode_params_appends_form_encoded_query() {
    let mut request = RestRequest::new(RestMethod::Get, "https://api.coinbase.com/api/v3/p")
        .with_params(&[("base_asset", "ETH"), ("wrapped_asset", "cbETH")]);
    request.encode_params().unwrap();
    assert_eq!(
        request.url,
        "https://api.coinbase.com/api/v3/p?base_asset=ETH&wrapped_asset=cbETH"
    );
    assert!(request.params.is_empty());
}

#[test]
fn test_encode_params_without_params_leaves_url_untouched() {
    let mut request = RestRequest::new(RestMethod::Get, "not a url");
    request.encode_params().unwrap();
    assert_eq!(request.url, "not a url");
}

#[test]
fn test_prepare_rejects_auth_without_signer() {
    let request =
        RestRequest::new(RestMethod::Get, "https://api.coinbase.com/api/v3/p").with_auth(true);
    let err = request.prepare(None).unwrap_err();
    assert!(matches!(err, WrappedError::ConfigError(_)));
}

#[test]
fn test_json_body_renders_compactly() {
    let body = RequestBody::Json(json!({"amount": "1.50"}));
    assert_eq!(body.to_text(), r#"{"amount":"1.50"}"#);
}

#[test]
fn test_response_exposes_json_and_text() {
    let response = RestResponse::new(200, r#"{"ok":true}"#);
    assert_eq!(response.json().unwrap(), json!({"ok": true}));
    assert!(RestResponse::new(200, "raw").json().is_err());
    assert_eq!(RestResponse::new(200, "raw").text(), "raw");
}

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

#[test]
fn test_decode_payload_keeps_objects() {
    let response = RestResponse::new(200, r#"{"pricing":[]}"#);
    assert_eq!(Value::Object(decode_payload(&response)), json!({"pricing": []}));
}

#[test]
fn test_decode_payload_wraps_raw_text() {
    let response = RestResponse::new(200, "raw text");
    assert_eq!(Value::Object(decode_payload(&response)), json!({"data": "raw text"}));
}

#[test]
fn test_decode_payload_wraps_non_object_json() {
    let response = RestResponse::new(200, "[1,2]");
    assert_eq!(Value::Object(decode_payload(&response)), json!({"data": [1, 2]}));
    let response = RestResponse::new(200, "");
    assert_eq!(Value::Object(decode_payload(&response)), json!({"data": ""}));
}
