//! Cross-field checks for price ranges.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::ValidationErrors;

const MAX_LESS_THAN_MIN: &str = "max_less_than_min";

/// Flags every `*Max` price that is lower than its `*Min` partner.
///
/// Pairs are `priceMin`/`priceMax` and `fooPriceMin`/`fooPriceMax`. A pair is
/// skipped when either side already has an error or is not a decimal.
pub fn check_price_ranges(data: &Map<String, Value>, errors: &mut ValidationErrors) {
    for min_key in data.keys().filter(|k| k.ends_with("riceMin")) {
        let prefix = &min_key[..min_key.len() - "Min".len()];
        let max_key = format!("{}Max", prefix);

        if errors.has_field(min_key) || errors.has_field(&max_key) {
            continue;
        }

        let min = data.get(min_key).and_then(as_decimal);
        let max = data.get(&max_key).and_then(as_decimal);

        if let (Some(min), Some(max)) = (min, max) {
            if max < min {
                errors.replace(max_key, MAX_LESS_THAN_MIN);
            }
        }
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
