//! Serde helpers for backend timestamps.
//!
//! The backend serializes `LocalDateTime` values without an offset
//! (`2025-03-01T18:30:00`), while other endpoints emit full RFC 3339. Both are
//! accepted; zone-less values are taken as UTC.
//!
//! Use on an `Option<DateTime<Utc>>` field:
//!
//! ```rust
//! # use chrono::{DateTime, Utc};
//! # use serde::Deserialize;
//! #[derive(Deserialize)]
//! struct Row {
//!     #[serde(default, with = "tiffin_core::types::timestamp")]
//!     created_at: Option<DateTime<Utc>>,
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse either an RFC 3339 timestamp or a zone-less ISO-8601 one.
#[must_use]
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serialize as RFC 3339, or `null`.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::ref_option)] // signature dictated by `#[serde(with)]`
pub fn serialize<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize from a string in either accepted format, or `null`.
///
/// # Errors
///
/// Returns an error if the string is present but not a timestamp.
pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map_or(Ok(None), |s| {
        parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    })
}
