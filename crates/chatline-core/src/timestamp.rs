//! Serde codec for backend timestamps.
//!
//! Outgoing timestamps are RFC 3339 UTC, keeping whatever sub-second
//! precision was parsed. Incoming timestamps may also be naive ISO-8601
//! (no offset, microseconds), which are read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time truncated to the precision the wire format keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Parse a backend timestamp.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a timestamp for the wire.
///
/// Server-issued timestamps are echoed back by full-replace writes, so the
/// fraction is never rounded.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse("2024-05-01T10:00:00.123Z").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.timestamp_subsec_micros(), 123456);

        let whole = parse("2024-05-01T10:00:00").unwrap();
        assert_eq!(whole.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_parse_offset_converted_to_utc() {
        let ts = parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("").is_none());
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn test_format_millis_utc() {
        let ts = parse("2024-05-01T10:00:00.5Z").unwrap();
        assert_eq!(format(&ts), "2024-05-01T10:00:00.500Z");
    }

    #[test]
    fn test_format_keeps_parsed_precision() {
        let ts = parse("2024-05-01T10:00:00.000123").unwrap();
        assert_eq!(format(&ts), "2024-05-01T10:00:00.000123Z");
        assert_eq!(parse(&format(&ts)), Some(ts));

        let whole = parse("2024-05-01T10:00:00").unwrap();
        assert_eq!(format(&whole), "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_serde_round_trip_keeps_micros() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Stamped {
            #[serde(with = "crate::timestamp")]
            created_at: DateTime<Utc>,
        }

        let stamped: Stamped =
            serde_json::from_str(r#"{"created_at":"2024-05-01T10:00:00.000123"}"#).unwrap();
        let wire = serde_json::to_string(&stamped).unwrap();
        assert_eq!(wire, r#"{"created_at":"2024-05-01T10:00:00.000123Z"}"#);
    }

    #[test]
    fn test_now_has_millisecond_precision() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
