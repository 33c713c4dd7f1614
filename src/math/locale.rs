//! Locale-aware numeric parsing.
//!
//! The reference tables mix two encodings:
//!
//! - absolute values with `.` thousands separators and a `,` decimal separator
//!   (`"5.000.000,00"`), read with [`to_decimal`]
//! - rates written with a `,` decimal separator and an optional `%` sign
//!   (`"12,34%"`), read with [`percent_to_decimal`]
//!
//! The two cleanups are deliberately separate: running a rate like `"4.5"`
//! through the thousands-separator cleanup would turn it into `45`.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("invalid numeric format: '{0}'")]
    InvalidNumericFormat(String),
}

/// Parse a table cell as an absolute decimal.
///
/// JSON numbers pass through; strings go through [`parse_locale_number`].
pub fn to_decimal(value: &Value) -> Result<f64, NumericError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| NumericError::InvalidNumericFormat(n.to_string())),
        Value::String(s) => parse_locale_number(s),
        other => Err(NumericError::InvalidNumericFormat(other.to_string())),
    }
}

/// Same as [`to_decimal`], but an unparseable value reads as `0.0`.
pub fn to_decimal_or_zero(value: &Value) -> f64 {
    to_decimal(value).unwrap_or(0.0)
}

/// Trim, drop `%`, drop `.` thousands separators, turn `,` into `.`, parse.
pub fn parse_locale_number(s: &str) -> Result<f64, NumericError> {
    let cleaned = s.trim().replace('%', "").replace('.', "").replace(',', ".");
    parse_finite(&cleaned).ok_or_else(|| NumericError::InvalidNumericFormat(s.to_string()))
}

/// Read a cell as a percentage and return the fraction (`"12,34%"` → `0.1234`).
pub fn percent_to_decimal(value: &Value) -> Result<f64, NumericError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|v| v / 100.0)
            .ok_or_else(|| NumericError::InvalidNumericFormat(n.to_string())),
        Value::String(s) => parse_decimal_comma(s).map(|v| v / 100.0),
        other => Err(NumericError::InvalidNumericFormat(other.to_string())),
    }
}

/// Trim, drop `%`, turn `,` into `.`, parse. Dots are kept as decimal points.
pub fn parse_decimal_comma(s: &str) -> Result<f64, NumericError> {
    let cleaned = s.trim().replace('%', "").replace(',', ".");
    parse_finite(cleaned.trim()).ok_or_else(|| NumericError::InvalidNumericFormat(s.to_string()))
}

/// Round to `places` decimal places.
///
/// Rounds the exact binary value, so `0.045` (stored as `0.04499…`) gives
/// `0.04`. Scaling by a power of ten first would round the product instead.
pub fn round_to(x: f64, places: u32) -> f64 {
    let text = format!("{x:.prec$}", prec = places as usize);
    text.parse().unwrap_or(x)
}

fn parse_finite(s: &str) -> Option<f64> {
    // `f64::from_str` accepts "inf" and "NaN"; the tables never mean those.
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
