//! Timestamp handling for backend payloads.
//!
//! The backend spells timestamps several ways depending on the service that
//! produced them: naive local time with or without fractional seconds
//! (`2023-08-24T10:30:00.123456`), and zoned variants with an offset or a
//! trailing `Z`, sometimes with seven fractional digits. This module is a
//! serde `with`-adapter that accepts all of them and normalizes to UTC.
//!
//! ```rust,ignore
//! #[derive(Deserialize)]
//! struct Entity {
//!     #[serde(with = "commerce_api::datetime")]
//!     date_added: DateTime<Utc>,
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

/// Naive wire format, fractional seconds optional.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses any of the backend's timestamp spellings into UTC.
///
/// Zoned values are converted; naive values are taken as already UTC, which
/// is what the backend means by them.
///
/// # Errors
///
/// Returns a description of the unparseable input.
pub fn parse_flexible(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Ok(zoned.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, NAIVE_FORMAT) {
        return Ok(naive.and_utc());
    }
    Err(format!("unrecognized timestamp format: {text:?}"))
}

/// serde deserializer half of the adapter.
///
/// # Errors
///
/// Fails when the value is not a string or matches none of the known
/// formats.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_flexible(&text).map_err(de::Error::custom)
}

/// serde serializer half of the adapter.
///
/// Writes RFC 3339 with microsecond precision and a `Z` suffix, the
/// spelling the backend accepts everywhere.
///
/// # Errors
///
/// Propagates serializer failures.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_naive_with_microseconds() {
        let parsed = parse_flexible("2023-08-24T10:30:00.123456").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2023, 8, 24, 10, 30, 0).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn test_parses_naive_without_fraction() {
        let parsed = parse_flexible("2023-08-24T10:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 24, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parses_zulu_with_seven_digits() {
        let parsed = parse_flexible("2023-08-24T10:30:00.1234567Z").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2023, 8, 24, 10, 30, 0).unwrap()
                + chrono::Duration::nanoseconds(123_456_700)
        );
    }

    #[test]
    fn test_parses_explicit_offset() {
        let parsed = parse_flexible("2023-08-24T10:30:00+03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 24, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_flexible("24/08/2023 10:30").is_err());
        assert!(parse_flexible("").is_err());
    }

    #[test]
    fn test_round_trip_through_serde() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Wrapper {
            #[serde(with = "crate::datetime")]
            at: DateTime<Utc>,
        }

        let source = Wrapper {
            at: Utc.with_ymd_and_hms(2023, 8, 24, 10, 30, 0).unwrap(),
        };
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"at":"2023-08-24T10:30:00.000000Z"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, source);
    }
}
