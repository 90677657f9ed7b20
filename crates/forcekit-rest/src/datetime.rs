//! The Salesforce timestamp convention.
//!
//! Salesforce emits `2016-01-01T12:00:00.000+0000` and accepts the RFC 3339
//! and date-only spellings as well. The server stores whole seconds, so values
//! truncate on construction and a round trip through the wire format preserves
//! the original to the second at best.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, ErrorKind, Result};

/// The wire format Salesforce emits.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// The alternate date-only spelling.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 1700-01-01T00:00:00Z, the earliest timestamp the platform stores.
const MIN_TIMESTAMP: i64 = -8_520_336_000;

/// A timestamp in the Salesforce wire convention.
///
/// Always UTC internally, always whole seconds, never before the platform's
/// 1700-01-01 floor. Serializes to the canonical millisecond-and-offset form
/// (`2016-01-01T12:00:00.000+0000`); deserializes from that form, from
/// RFC 3339, and from a bare date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SfDateTime(DateTime<Utc>);

impl SfDateTime {
    /// Build from a chrono timestamp, truncating sub-second precision.
    ///
    /// Returns `None` when the value falls before the 1700-01-01 floor, which
    /// the platform cannot represent.
    pub fn new(value: DateTime<Utc>) -> Option<Self> {
        let truncated = value.with_nanosecond(0).unwrap_or(value);
        if truncated.timestamp() < MIN_TIMESTAMP {
            return None;
        }
        Some(Self(truncated))
    }

    /// Parse any of the accepted spellings.
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_str(value, WIRE_FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
            .or_else(|_| parse_bare_date(value))
            .map_err(|err| {
                Error::with_source(ErrorKind::Datetime(format!("`{value}`: {err}")), err)
            })?;

        Self::new(parsed).ok_or_else(|| {
            Error::new(ErrorKind::Datetime(format!(
                "`{value}` predates the platform minimum of 1700-01-01"
            )))
        })
    }

    /// The underlying UTC timestamp.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

fn parse_bare_date(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

impl fmt::Display for SfDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl From<SfDateTime> for DateTime<Utc> {
    fn from(value: SfDateTime) -> Self {
        value.0
    }
}

impl Serialize for SfDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SfDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SfDateTime::parse(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for `Option<SfDateTime>` fields.
///
/// The API hands back `null` or an empty string for unset audit dates; both
/// map to `None`.
pub mod option {
    use super::SfDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<SfDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => dt.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SfDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(text) => SfDateTime::parse(text).map(Some).map_err(D::Error::custom),
        }
    }
}
