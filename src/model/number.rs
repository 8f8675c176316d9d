//! Float wire form for prices.
//!
//! Whole prices are written without a fractional part (`10`, not `10.0`), matching the
//! artifacts produced by the Go service. Both forms read back into `f64`.

use serde::Serializer;

/// Whole values below this magnitude are exact as `i64`.
const MAX_WHOLE: f64 = 9.0e18;

/// Serializes `value` as an integer when it has no fractional part.
pub fn compact_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_WHOLE {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Priced {
        #[serde(serialize_with = "compact_float")]
        price: f64,
    }

    #[test]
    fn test_whole_prices_drop_the_fraction() {
        let json = |price| serde_json::to_string(&Priced { price }).unwrap();
        assert_eq!(json(10.0), r#"{"price":10}"#);
        assert_eq!(json(0.0), r#"{"price":0}"#);
        assert_eq!(json(-3.0), r#"{"price":-3}"#);
        assert_eq!(json(12.5), r#"{"price":12.5}"#);
        assert_eq!(json(0.1), r#"{"price":0.1}"#);
    }

    #[test]
    fn test_both_forms_read_back() {
        let whole: Priced = serde_json::from_str(r#"{"price":10}"#).unwrap();
        let dotted: Priced = serde_json::from_str(r#"{"price":10.0}"#).unwrap();
        assert_eq!(whole, dotted);
        assert_eq!(whole.price, 10.0);
    }
}
