/// A positive decimal amount for wrap requests.
///
/// Holds the caller's decimal string and transmits it verbatim, so there is
/// no rounding and no precision ceiling. There is no `From<f64>` on purpose.
/// Serializes as a JSON string.
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::WrappedError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WrapAmount(String);

impl WrapAmount {
    /// Validate a plain decimal string such as `"1"`, `"0.25"` or `".5"`.
    ///
    /// Signs, exponents, whitespace and zero values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, WrappedError> {
        let value = value.into();
        let (int_part, frac_part) = match value.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (value.as_str(), ""),
        };
        let well_formed = !(int_part.is_empty() && frac_part.is_empty())
            && int_part.bytes().all(|b| b.is_ascii_digit())
            && frac_part.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(WrappedError::InvalidAmount(format!(
                "not a plain decimal: {value:?}"
            )));
        }
        if value.bytes().all(|b| b == b'0' || b == b'.') {
            return Err(WrappedError::InvalidAmount(format!(
                "amount must be positive: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WrapAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WrapAmount {
    type Err = WrappedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WrapAmount {
    type Error = WrappedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for WrapAmount {
    type Error = WrappedError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Keeps the decimal's scale, so `dec!(1.50)` becomes `"1.50"`.
impl TryFrom<Decimal> for WrapAmount {
    type Error = WrappedError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(WrappedError::InvalidAmount(format!(
                "amount cannot be negative: {value}"
            )));
        }
        Self::new(value.to_string())
    }
}

impl From<WrapAmount> for String {
    fn from(amount: WrapAmount) -> Self {
        amount.0
    }
}
