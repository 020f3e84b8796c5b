use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::Error;

/// Offset-less datetime formats accepted in addition to RFC 3339.
static NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO 8601 style timestamp as supplied by the tracker.
///
/// The wall-clock value is kept as written: timestamps carrying an offset are not
/// converted to UTC or the local timezone.
#[derive(DeserializeFromStr, SerializeDisplay, Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    value: NaiveDateTime,
}

impl Timestamp {
    /// Calendar date component.
    pub fn date(&self) -> NaiveDate {
        self.value.date()
    }

    /// Time of day component.
    pub fn time(&self) -> NaiveTime {
        self.value.time()
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let value = if let Ok(value) = DateTime::parse_from_rfc3339(s) {
            value.naive_local()
        } else if let Some(value) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            value
        } else {
            NaiveDate::from_str(s)
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|e| Error::InvalidValue(format!("invalid timestamp: {s}: {e}")))?
        };

        Ok(Self {
            raw: s.to_string(),
            value,
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        // invalid
        for s in ["", "0", "2024-13-01", "10:30:00", "2024-01-15T25:00:00", "yesterday"] {
            assert!(Timestamp::from_str(s).is_err(), "{s:?} didn't fail");
        }

        // valid
        for (s, date, time) in [
            ("2024-01-15T10:30:00", "2024-01-15", "10:30:00"),
            ("2024-01-15T10:30:00Z", "2024-01-15", "10:30:00"),
            ("2024-01-15T10:30:00+05:00", "2024-01-15", "10:30:00"),
            ("1996-12-19T16:39:57-08:00", "1996-12-19", "16:39:57"),
            ("2024-01-15 10:30:00", "2024-01-15", "10:30:00"),
            ("2024-01-15T10:30:00.250", "2024-01-15", "10:30:00.250"),
            ("2024-01-15T10:30", "2024-01-15", "10:30:00"),
            ("2024-01-15", "2024-01-15", "00:00:00"),
        ] {
            let timestamp = Timestamp::from_str(s).unwrap();
            assert_eq!(timestamp.to_string(), s);
            assert_eq!(timestamp.as_ref(), s);
            assert_eq!(timestamp.date().to_string(), date);
            assert_eq!(timestamp.time().to_string(), time);
        }
    }

    #[test]
    fn deserialize() {
        let timestamp: Timestamp = serde_json::from_str(r#""2024-01-15T10:30:00Z""#).unwrap();
        assert_eq!(timestamp.date().to_string(), "2024-01-15");
        assert!(serde_json::from_str::<Timestamp>(r#""not a date""#).is_err());
    }
}
