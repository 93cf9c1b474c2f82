//! Timestamp, weekday and time-of-day utilities

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Wire format for class meeting times
pub const TIME_FORMAT: &str = "%H:%M";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Day of the week a class meets on
///
/// Ordered Saturday-first, matching the academic week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sat,
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sat,
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Weekday::ALL
            .iter()
            .find(|day| day.as_str() == s)
            .copied()
            .ok_or_else(|| Error::bad_request(format!("Invalid weekday: {}", s)))
    }
}

/// Parse a `HH:MM` time-of-day (24-hour clock)
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|_| Error::bad_request(format!("Invalid time format, expected HH:MM: {}", s)))
}

/// Format a time-of-day as zero-padded `HH:MM`
pub fn format_time_of_day(t: &NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Serde adapter for `NaiveTime` fields carried as `HH:MM` strings
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time_of_day(t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_weekday_round_trips_through_str() {
        for day in Weekday::ALL {
            assert_eq!(day.as_str().parse::<Weekday>().unwrap(), day);
        }
    }

    #[test]
    fn test_weekday_rejects_unknown() {
        let err = "Monday".parse::<Weekday>().unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_weekday_serde_names() {
        let json = serde_json::to_string(&vec![Weekday::Sat, Weekday::Fri]).unwrap();
        assert_eq!(json, r#"["Sat","Fri"]"#);
    }

    #[test]
    fn test_parse_time_of_day() {
        let t = parse_time_of_day("09:30").unwrap();
        assert_eq!(format_time_of_day(&t), "09:30");
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("9am").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Slot {
        #[serde(with = "hhmm")]
        at: NaiveTime,
    }

    #[test]
    fn test_hhmm_adapter() {
        let slot: Slot = serde_json::from_str(r#"{"at":"14:05"}"#).unwrap();
        assert_eq!(slot.at, NaiveTime::from_hms_opt(14, 5, 0).unwrap());
        assert_eq!(serde_json::to_string(&slot).unwrap(), r#"{"at":"14:05"}"#);

        let bad = serde_json::from_str::<Slot>(r#"{"at":"14:5x"}"#);
        assert!(bad.is_err());
    }
}
