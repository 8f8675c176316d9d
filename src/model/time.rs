//! Serde helpers for fields whose "unset" state has a fixed wire form.
//!
//! Unset timestamps are written as `0001-01-01T00:00:00Z` rather than `null`, and
//! `null` lists are read back as empty, so artifacts stay loadable in both directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Wire form of an unset timestamp.
pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// `Option<DateTime<Utc>>` where `None` travels as [`ZERO_TIME`].
pub mod zero_as_none {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)),
            None => serializer.serialize_str(ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let parsed = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| D::Error::custom(format!("invalid timestamp {raw:?}: {e}")))?
            .with_timezone(&Utc);
        if parsed.timestamp() == ZERO_TIME_SECS && parsed.timestamp_subsec_nanos() == 0 {
            Ok(None)
        } else {
            Ok(Some(parsed))
        }
    }
}

/// Reads `null` as an empty list.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(default, with = "zero_as_none")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "null_as_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn test_unset_timestamp_uses_zero_time() {
        let json = serde_json::to_string(&Stamped { at: None, tags: vec![] }).unwrap();
        assert_eq!(json, r#"{"at":"0001-01-01T00:00:00Z","tags":[]}"#);
    }

    #[test]
    fn test_zero_missing_and_null_read_as_unset() {
        for json in [
            r#"{"at":"0001-01-01T00:00:00Z"}"#,
            r#"{"at":null}"#,
            r#"{}"#,
        ] {
            let parsed: Stamped = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.at, None, "{json}");
        }
    }

    #[test]
    fn test_set_timestamp_keeps_offset_normalised() {
        let parsed: Stamped =
            serde_json::from_str(r#"{"at":"2024-03-01T12:00:00+02:00","tags":null}"#).unwrap();
        assert_eq!(parsed.at, Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()));
        assert!(parsed.tags.is_empty());
    }
}
