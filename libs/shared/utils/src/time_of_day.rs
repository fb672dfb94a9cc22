use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid HH:mm time of day")]
pub struct TimeFormatError {
    pub value: String,
}

fn hhmm_regex() -> &'static Regex {
    static HHMM: OnceLock<Regex> = OnceLock::new();
    HHMM.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("HH:mm pattern is valid")
    })
}

/// Parses a strict `HH:mm` string (two digit hour 00-23, two digit minute).
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, TimeFormatError> {
    let invalid = || TimeFormatError { value: value.to_string() };

    let captures = hhmm_regex().captures(value).ok_or_else(invalid)?;
    let hours: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = captures[2].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Serde adapter for `NaiveTime` fields carried on the wire as `HH:mm`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(de::Error::custom)
    }
}
