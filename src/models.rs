/// Data models for the wrapped-asset endpoints.
///
/// REST calls return loosely-typed JSON mappings ([`JsonMap`]); the types here
/// give typed views over the fields the client interprets.
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::decimal::WrapAmount;
use crate::errors::WrappedError;

/// Decoded response payload. Always a JSON object.
pub type JsonMap = serde_json::Map<String, Value>;

/// Deserialize an optional value that may be a JSON number or a string, storing as String.
fn deserialize_optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Null) | None => Ok(None),
        Some(v) => Ok(Some(v.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// One entry of `GET /exchange/assets/wrapped/pricing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEntry {
    #[serde(default)]
    pub base_asset: Option<String>,
    #[serde(default)]
    pub wrapped_asset: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub rate: Option<String>,
}

impl PricingEntry {
    /// Exact, case-sensitive pair match.
    pub fn matches(&self, base_asset: &str, wrapped_asset: &str) -> bool {
        self.base_asset.as_deref() == Some(base_asset)
            && self.wrapped_asset.as_deref() == Some(wrapped_asset)
    }

    fn raw_rate(&self) -> Result<&str, WrappedError> {
        self.rate.as_deref().ok_or_else(|| {
            WrappedError::JsonError(format!(
                "pricing entry {:?}/{:?} has no rate",
                self.base_asset, self.wrapped_asset
            ))
        })
    }

    pub fn rate_f64(&self) -> Result<f64, WrappedError> {
        let raw = self.raw_rate()?;
        raw.trim()
            .parse()
            .map_err(|e| WrappedError::JsonError(format!("invalid rate {raw:?}: {e}")))
    }

    /// Exact rate, for callers that cannot afford float rounding.
    pub fn rate_decimal(&self) -> Result<Decimal, WrappedError> {
        let raw = self.raw_rate()?;
        raw.trim()
            .parse()
            .map_err(|e| WrappedError::JsonError(format!("invalid rate {raw:?}: {e}")))
    }
}

/// First entry of `payload["pricing"]` matching the pair.
///
/// Entries that are not shaped like pricing objects are skipped.
pub fn find_pricing(payload: &JsonMap, base_asset: &str, wrapped_asset: &str) -> Option<PricingEntry> {
    payload
        .get("pricing")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|entry| serde_json::from_value::<PricingEntry>(entry.clone()).ok())
        .find(|entry| entry.matches(base_asset, wrapped_asset))
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Body of `POST /brokerage/wrapped-assets/convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub base_asset: String,
    pub wrapped_asset: String,
    pub amount: WrapAmount,
}

impl ConversionRequest {
    pub fn new(base_asset: &str, wrapped_asset: &str, amount: WrapAmount) -> Self {
        Self {
            base_asset: base_asset.to_string(),
            wrapped_asset: wrapped_asset.to_string(),
            amount,
        }
    }
}

/// Server-reported conversion state.
///
/// Values the SDK does not know yet are kept as [`ConversionStatus::Unknown`]
/// and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Unknown(String),
}

impl ConversionStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => ConversionStatus::Pending,
            "processing" => ConversionStatus::Processing,
            "completed" => ConversionStatus::Completed,
            "failed" => ConversionStatus::Failed,
            "cancelled" => ConversionStatus::Cancelled,
            other => ConversionStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConversionStatus::Pending => "pending",
            ConversionStatus::Processing => "processing",
            ConversionStatus::Completed => "completed",
            ConversionStatus::Failed => "failed",
            ConversionStatus::Cancelled => "cancelled",
            ConversionStatus::Unknown(other) => other,
        }
    }

    /// No further change is expected once a conversion reaches this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionStatus::Completed | ConversionStatus::Failed | ConversionStatus::Cancelled
        )
    }

    /// Read `payload["status"]`. `None` when absent or not a string.
    pub fn from_payload(payload: &JsonMap) -> Option<Self> {
        payload
            .get("status")
            .and_then(Value::as_str)
            .map(ConversionStatus::parse)
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConversionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConversionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ConversionStatus::parse(&s))
    }
}

/// Read the server-assigned `conversion_id` from a submission response.
///
/// Numeric ids are rendered as strings; null and empty strings count as absent.
pub fn conversion_id(payload: &JsonMap) -> Option<String> {
    match payload.get("conversion_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Result of a wrap that was submitted and tracked to a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub conversion_id: String,
    pub status: ConversionStatus,
    /// Raw submission response.
    pub submission: JsonMap,
    /// Raw status payload that carried the terminal state.
    pub final_status: JsonMap,
}

impl ConversionOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == ConversionStatus::Completed
    }
}
