//! Sentinel-aware conversion from raw wire strings to typed fields
//!
//! The upstream feed encodes "value unavailable" as `-1`; that sentinel
//! and any unparsable numeric both coerce to zero rather than failing,
//! so a malformed scalar never aborts ingestion of the record.

use chrono::{DateTime, Utc};
use fe_srm::Timestamp;

/// Parse an integer field; `-1` and garbage both become 0.
pub fn parse_int(value: &str) -> i64 {
    match value.parse::<i64>() {
        Ok(-1) | Err(_) => 0,
        Ok(parsed) => parsed,
    }
}

/// Parse a float field; `-1` and garbage both become 0.
pub fn parse_float(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(parsed) if parsed != -1.0 => parsed,
        _ => 0.0,
    }
}

/// True when the raw value matches one of the enumerated trigger values.
///
/// Used for fields whose boolean meaning is derived from a different
/// source field's string (e.g. guzzler = "T" or "G").
pub fn parse_flag(value: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| value == *t)
}

/// Parse the feed's RFC 3339 date-time layout, falling back to the
/// zero timestamp on failure.
pub fn parse_timestamp(value: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(value)
        .map(|t| Timestamp(t.with_timezone(&Utc)))
        .unwrap_or_default()
}
