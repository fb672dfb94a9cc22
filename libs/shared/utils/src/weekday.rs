//! Weekday numbering shared by every boundary that stores or displays a day.
//!
//! Availability rules are stored with ISO 8601 numbering (Monday = 1 through
//! Sunday = 7). Browser clients number days the way `Date.getDay()` does
//! (Sunday = 0 through Saturday = 6). All conversions between the two, and to
//! and from `chrono::Weekday`, go through [`IsoWeekday`].

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekdayError {
    #[error("weekday {0} is outside the ISO range 1 (Monday) to 7 (Sunday)")]
    OutOfIsoRange(i32),

    #[error("weekday {0} is outside the client range 0 (Sunday) to 6 (Saturday)")]
    OutOfClientRange(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub enum IsoWeekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl IsoWeekday {
    pub const ALL: [IsoWeekday; 7] = [
        IsoWeekday::Monday,
        IsoWeekday::Tuesday,
        IsoWeekday::Wednesday,
        IsoWeekday::Thursday,
        IsoWeekday::Friday,
        IsoWeekday::Saturday,
        IsoWeekday::Sunday,
    ];

    pub fn from_iso(day: i32) -> Result<Self, WeekdayError> {
        if !(1..=7).contains(&day) {
            return Err(WeekdayError::OutOfIsoRange(day));
        }
        Ok(Self::ALL[(day - 1) as usize])
    }

    /// Parses the Sunday = 0 numbering used by browser clients.
    pub fn from_sunday_zero(day: i32) -> Result<Self, WeekdayError> {
        match day {
            0 => Ok(IsoWeekday::Sunday),
            1..=6 => Ok(Self::ALL[(day - 1) as usize]),
            _ => Err(WeekdayError::OutOfClientRange(day)),
        }
    }

    pub fn iso(self) -> u8 {
        self as u8
    }

    pub fn sunday_zero(self) -> u8 {
        match self {
            IsoWeekday::Sunday => 0,
            other => other as u8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IsoWeekday::Monday => "Monday",
            IsoWeekday::Tuesday => "Tuesday",
            IsoWeekday::Wednesday => "Wednesday",
            IsoWeekday::Thursday => "Thursday",
            IsoWeekday::Friday => "Friday",
            IsoWeekday::Saturday => "Saturday",
            IsoWeekday::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for IsoWeekday {
    fn from(day: Weekday) -> Self {
        // number_from_monday is 1..=7, always in range
        Self::ALL[day.number_from_monday() as usize - 1]
    }
}

impl From<IsoWeekday> for Weekday {
    fn from(day: IsoWeekday) -> Self {
        match day {
            IsoWeekday::Monday => Weekday::Mon,
            IsoWeekday::Tuesday => Weekday::Tue,
            IsoWeekday::Wednesday => Weekday::Wed,
            IsoWeekday::Thursday => Weekday::Thu,
            IsoWeekday::Friday => Weekday::Fri,
            IsoWeekday::Saturday => Weekday::Sat,
            IsoWeekday::Sunday => Weekday::Sun,
        }
    }
}

impl TryFrom<i32> for IsoWeekday {
    type Error = WeekdayError;

    fn try_from(day: i32) -> Result<Self, Self::Error> {
        Self::from_iso(day)
    }
}

impl From<IsoWeekday> for u8 {
    fn from(day: IsoWeekday) -> Self {
        day.iso()
    }
}

impl fmt::Display for IsoWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Datelike, NaiveDate};

    use super::*;

    #[test]
    fn test_sunday_is_seven_in_iso_and_zero_for_clients() {
        assert_eq!(IsoWeekday::Sunday.iso(), 7);
        assert_eq!(IsoWeekday::Sunday.sunday_zero(), 0);
        assert_eq!(IsoWeekday::from_sunday_zero(0), Ok(IsoWeekday::Sunday));
        assert_eq!(IsoWeekday::from_iso(7), Ok(IsoWeekday::Sunday));
    }

    #[test]
    fn test_conversions_agree_for_every_day() {
        for day in IsoWeekday::ALL {
            assert_eq!(IsoWeekday::from_iso(day.iso() as i32), Ok(day));
            assert_eq!(IsoWeekday::from_sunday_zero(day.sunday_zero() as i32), Ok(day));
            assert_eq!(IsoWeekday::from(Weekday::from(day)), day);
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert_matches!(IsoWeekday::from_iso(0), Err(WeekdayError::OutOfIsoRange(0)));
        assert_matches!(IsoWeekday::from_iso(8), Err(WeekdayError::OutOfIsoRange(8)));
        assert_matches!(IsoWeekday::from_sunday_zero(7), Err(WeekdayError::OutOfClientRange(7)));
        assert_matches!(IsoWeekday::from_sunday_zero(-1), Err(WeekdayError::OutOfClientRange(-1)));
    }

    #[test]
    fn test_matches_calendar_dates() {
        // 2026-10-19 is a Monday, 2026-10-25 a Sunday
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();

        assert_eq!(IsoWeekday::from(monday.weekday()), IsoWeekday::Monday);
        assert_eq!(IsoWeekday::from(sunday.weekday()), IsoWeekday::Sunday);
    }

    #[test]
    fn test_serializes_as_iso_number() {
        assert_eq!(serde_json::to_string(&IsoWeekday::Sunday).unwrap(), "7");
        let parsed: IsoWeekday = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, IsoWeekday::Wednesday);
        assert!(serde_json::from_str::<IsoWeekday>("0").is_err());
    }
}
