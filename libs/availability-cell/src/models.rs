use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_config::SlotBoundaryPolicy;
use shared_utils::time_of_day::{self, hhmm};
use shared_utils::IsoWeekday;

use crate::error::SlotError;

pub type ProviderId = i64;

/// A recurring weekly window as stored by the persistence service.
///
/// Times are kept as the raw `HH:mm` strings the provider entered; they are
/// checked by [`AvailabilityWindow::from_rule`] before any slot is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub provider_id: ProviderId,
    /// ISO 8601 numbering, Monday = 1 through Sunday = 7.
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration_minutes: i32,
}

impl AvailabilityRule {
    pub fn new(
        provider_id: ProviderId,
        weekday: IsoWeekday,
        start_time: &str,
        end_time: &str,
        slot_duration_minutes: i32,
    ) -> Self {
        Self {
            id: None,
            provider_id,
            weekday: weekday.iso() as i32,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            slot_duration_minutes,
        }
    }
}

/// A validated [`AvailabilityRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub provider_id: ProviderId,
    pub weekday: IsoWeekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub slot_duration_minutes: u32,
}

impl AvailabilityWindow {
    pub fn from_rule(index: usize, rule: &AvailabilityRule) -> Result<Self, SlotError> {
        let weekday = IsoWeekday::from_iso(rule.weekday)
            .map_err(|source| SlotError::InvalidWeekday { index, source })?;

        let start = time_of_day::parse_hhmm(&rule.start_time).map_err(|source| SlotError::InvalidTime {
            index,
            field: "start_time",
            source,
        })?;
        let end = time_of_day::parse_hhmm(&rule.end_time).map_err(|source| SlotError::InvalidTime {
            index,
            field: "end_time",
            source,
        })?;

        if end <= start {
            return Err(SlotError::EmptyWindow {
                index,
                start: rule.start_time.clone(),
                end: rule.end_time.clone(),
            });
        }

        if rule.slot_duration_minutes <= 0 {
            return Err(SlotError::InvalidSlotDuration {
                index,
                minutes: rule.slot_duration_minutes,
            });
        }

        Ok(Self {
            provider_id: rule.provider_id,
            weekday,
            start,
            end,
            slot_duration_minutes: rule.slot_duration_minutes as u32,
        })
    }

    pub fn overlaps(&self, other: &AvailabilityWindow) -> bool {
        self.weekday == other.weekday && self.start < other.end && other.start < self.end
    }
}

/// A concrete bookable slot. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
}

impl Slot {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(self.duration_minutes as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProviderId,
    pub first_name: String,
    pub last_name: String,
    pub specialty: Option<String>,
}

impl ProviderProfile {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRulesRequest {
    pub rules: Vec<AvailabilityRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotsQuery {
    pub horizon_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub provider_id: ProviderId,
    pub provider_name: Option<String>,
    pub specialty: Option<String>,
    pub horizon_days: u32,
    pub boundary_policy: SlotBoundaryPolicy,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total: usize,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayInfo {
    pub iso: u8,
    pub sunday_zero: u8,
    pub name: String,
}

impl From<IsoWeekday> for WeekdayInfo {
    fn from(day: IsoWeekday) -> Self {
        Self {
            iso: day.iso(),
            sunday_zero: day.sunday_zero(),
            name: day.name().to_string(),
        }
    }
}
