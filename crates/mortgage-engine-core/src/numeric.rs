//! Lenient numeric coercion for records arriving from the web tier.
//!
//! Intake forms and ORM rows hand the engines numbers, numeric strings
//! ("$250,000"), blanks and nulls interchangeably. Everything here degrades to
//! a default instead of failing, so a malformed field can never abort an
//! engine run.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Coerce a JSON value to a decimal.
///
/// Numbers pass through; strings are trimmed and stripped of `$` and `,`
/// before parsing. Anything else (null, bools, arrays, objects, garbage text)
/// yields `default`.
pub fn to_number(value: &Value, default: Decimal) -> Decimal {
    to_opt_number(value).unwrap_or(default)
}

/// Like [`to_number`] but distinguishes "absent" from zero.
pub fn to_opt_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string())
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                parse_decimal(&cleaned)
            }
        }
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Truthiness of a loosely typed flag ("yes", "true", 1, true).
pub fn to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

/// Textual view of a loosely typed field; null becomes empty.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `deserialize_with` helpers built on the coercions above.
pub mod lenient {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn money<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_number(&v, Decimal::ZERO))
    }

    pub fn opt_money<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_opt_number(&v))
    }

    /// Credit scores are whole numbers; fractional input is truncated and
    /// anything out of the u32 range is treated as missing.
    pub fn opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_opt_number(&v).and_then(|n| n.trunc().to_u32()))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_number(&v, Decimal::ZERO).trunc().to_u32().unwrap_or(0))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_flag(&v))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(super::to_text(&v))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let v = Value::deserialize(d)?;
        let s = super::to_text(&v);
        Ok((!s.trim().is_empty()).then_some(s))
    }

    /// A list of records; a non-list is empty and malformed entries are skipped.
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        Ok(match v {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_currency_strings() {
        assert_eq!(to_number(&json!("$250,000"), Decimal::ZERO), dec!(250000));
        assert_eq!(to_number(&json!("  1,234.50 "), Decimal::ZERO), dec!(1234.50));
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        assert_eq!(to_number(&json!("n/a"), dec!(7)), dec!(7));
        assert_eq!(to_number(&json!(""), dec!(7)), dec!(7));
        assert_eq!(to_number(&Value::Null, dec!(7)), dec!(7));
        assert_eq!(to_number(&json!([1, 2]), dec!(7)), dec!(7));
        assert_eq!(to_number(&json!(true), dec!(7)), dec!(7));
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(to_number(&json!(42), Decimal::ZERO), dec!(42));
        assert_eq!(to_number(&json!(-3.5), Decimal::ZERO), dec!(-3.5));
        assert_eq!(to_number(&json!(1e5), Decimal::ZERO), dec!(100000));
    }

    #[test]
    fn test_optional_distinguishes_absent() {
        assert_eq!(to_opt_number(&Value::Null), None);
        assert_eq!(to_opt_number(&json!("abc")), None);
        assert_eq!(to_opt_number(&json!("0")), Some(Decimal::ZERO));
    }

    #[test]
    fn test_flags() {
        assert!(to_flag(&json!("Yes")));
        assert!(to_flag(&json!(1)));
        assert!(!to_flag(&json!("no")));
        assert!(!to_flag(&Value::Null));
    }
}
