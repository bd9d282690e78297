use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GeminiError, GeminiResult};

/// RFC 3339 instant with nanosecond precision, e.g. `2024-05-01T12:00:00.5Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses RFC 3339 text with any offset, normalised to UTC.
    pub fn parse(text: &str) -> GeminiResult<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| super::invalid_value("timestamp", format!("{text}: {e}")))
    }

    /// Builds from seconds and nanoseconds since the Unix epoch.
    pub fn from_epoch(seconds: i64, nanos: u32) -> GeminiResult<Self> {
        DateTime::from_timestamp(seconds, nanos)
            .map(Self)
            .ok_or_else(|| super::invalid_value("timestamp", "epoch value out of range"))
    }

    /// True if `text` parses as RFC 3339.
    pub fn is_valid(text: &str) -> bool {
        DateTime::parse_from_rfc3339(text).is_ok()
    }

    /// Seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Sub-second nanoseconds.
    pub fn nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// RFC 3339 text with `Z` suffix and only as many fraction digits as needed.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// The underlying chrono value.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// True if this instant is in the past.
    pub fn is_past(&self) -> bool {
        self.0 <= Utc::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl FromStr for Timestamp {
    type Err = GeminiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Signed protobuf duration, written on the wire as `"3.5s"`.
///
/// ```
/// use gemini_sdk::support::Duration;
///
/// let ttl: Duration = "300.250s".parse().unwrap();
/// assert_eq!(ttl.seconds(), 300);
/// assert_eq!(ttl.nanos(), 250_000_000);
/// assert_eq!(ttl.to_string(), "300.25s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: i64,
    nanos: i32,
}

impl Duration {
    /// Whole seconds.
    pub const fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Milliseconds, split into seconds and nanos.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis / 1000,
            nanos: ((millis % 1000) * 1_000_000) as i32,
        }
    }

    /// Whole minutes.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self::from_secs(minutes * 60)
    }

    /// Whole-second component.
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond component, same sign as `seconds`.
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Parses `"<seconds>[.<fraction>]s"`. Fractions beyond nine digits are truncated.
    pub fn parse(text: &str) -> GeminiResult<Self> {
        let invalid = || super::invalid_value("duration", format!("expected '<seconds>s', got '{text}'"));

        let body = text.trim().strip_suffix('s').ok_or_else(invalid)?;
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let seconds: i64 = whole.parse().map_err(|_| invalid())?;
        let mut digits: String = fraction.chars().take(9).collect();
        while digits.len() < 9 {
            digits.push('0');
        }
        let nanos: i32 = digits.parse().map_err(|_| invalid())?;

        Ok(if negative {
            Self {
                seconds: -seconds,
                nanos: -nanos,
            }
        } else {
            Self { seconds, nanos }
        })
    }

    /// Total length in nanoseconds.
    pub fn as_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Converts to a std duration; `None` for negative values.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        let seconds = u64::try_from(self.seconds).ok()?;
        let nanos = u32::try_from(self.nanos).ok()?;
        Some(std::time::Duration::new(seconds, nanos))
    }
}

impl From<std::time::Duration> for Duration {
    #[allow(clippy::cast_possible_wrap)]
    fn from(d: std::time::Duration) -> Self {
        Self {
            seconds: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            nanos: d.subsec_nanos() as i32,
        }
    }
}

impl FromStr for Duration {
    type Err = GeminiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return write!(f, "{}s", self.seconds);
        }
        let sign = if self.seconds < 0 || self.nanos < 0 { "-" } else { "" };
        let fraction = format!("{:09}", self.nanos.unsigned_abs());
        write!(
            f,
            "{sign}{}.{}s",
            self.seconds.unsigned_abs(),
            fraction.trim_end_matches('0')
        )
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
