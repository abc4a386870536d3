// Time utilities shared by the scheduler and the countdown deriver.
// Everything here works in epoch milliseconds.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Digit strings shorter than this are not trusted as epoch milliseconds.
/// Ten digits only reach late April 1970.
const MIN_EPOCH_MS_DIGITS: usize = 11;

/// Naive date-time layouts accepted in addition to RFC 3339.
/// `%.f` makes the fractional part optional.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),
    #[error("countdown window must be positive, got {0}ms")]
    InvalidWindow(i64),
}

/// A timestamp as handed over by the gig store: either epoch milliseconds
/// or free text that still has to be parsed.
///
/// Any other JSON value (floats, booleans, objects) is kept as `Invalid`
/// so one bad record never rejects the rest of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    EpochMs(i64),
    Text(String),
    Invalid(serde_json::Value),
}

impl Timestamp {
    pub fn to_epoch_ms(&self) -> Result<i64, TimeError> {
        match self {
            Timestamp::EpochMs(ms) => Ok(*ms),
            Timestamp::Text(text) => parse_epoch_ms(text),
            Timestamp::Invalid(raw) => Err(TimeError::MalformedTimestamp(raw.to_string())),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::EpochMs(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Timestamp::Text(text)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Timestamp::EpochMs(value.timestamp_millis())
    }
}

/// Parse a textual timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, naive date-times and bare dates in the local time zone,
/// compact `YYYYMMDD` dates, and integer strings of at least 11 digits
/// (epoch milliseconds). Shorter digit runs are rejected.
pub fn parse_epoch_ms(text: &str) -> Result<i64, TimeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeError::MalformedTimestamp(text.to_string()));
    }

    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return parse_digits(trimmed, unsigned, text);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.timestamp_millis());
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return local_epoch_ms(naive, text);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return local_epoch_ms(midnight, text);
        }
    }

    Err(TimeError::MalformedTimestamp(text.to_string()))
}

fn parse_digits(trimmed: &str, unsigned: &str, original: &str) -> Result<i64, TimeError> {
    let malformed = || TimeError::MalformedTimestamp(original.to_string());

    if trimmed.len() == 8 {
        let part = |range: std::ops::Range<usize>| trimmed[range].parse::<u32>().ok();
        let midnight = match (part(0..4), part(4..6), part(6..8)) {
            (Some(year), Some(month), Some(day)) => i32::try_from(year)
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            _ => None,
        };
        return midnight.map_or_else(|| Err(malformed()), |naive| local_epoch_ms(naive, original));
    }

    if unsigned.len() < MIN_EPOCH_MS_DIGITS {
        return Err(malformed());
    }
    trimmed.parse::<i64>().map_err(|_| malformed())
}

fn local_epoch_ms(naive: NaiveDateTime, original: &str) -> Result<i64, TimeError> {
    // A local time inside a DST gap has no instant; treat it as bad data.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| TimeError::MalformedTimestamp(original.to_string()))
}

/// Render a millisecond delta as `HH:MM:SS`, truncating sub-second remainder.
/// Hours are not wrapped at 24; negative deltas render as zero.
pub fn format_hms(delta_ms: i64) -> String {
    let delta_ms = delta_ms.max(0);
    let hours = delta_ms / MS_PER_HOUR;
    let minutes = (delta_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (delta_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn hours_to_ms(hours: u32) -> i64 {
    i64::from(hours) * MS_PER_HOUR
}

pub fn minutes_to_ms(minutes: u32) -> i64 {
    i64::from(minutes) * MS_PER_MINUTE
}
