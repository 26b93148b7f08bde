use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Coerces a raw input value into a monetary amount.
///
/// Numbers pass through, strings are parsed after trimming. Plain decimal notation
/// (`"250.75"`) and exponent notation (`"1e3"`) are both understood. Anything else,
/// or anything that does not fit into a [`Decimal`], yields `None`.
pub fn coerce_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Renders a raw input value the way it appears in rejection reasons:
/// strings without quotes, everything else as JSON text.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
