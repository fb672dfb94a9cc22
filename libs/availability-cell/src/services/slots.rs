use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use tracing::debug;

use shared_config::{AppConfig, SlotBoundaryPolicy};
use shared_utils::time_of_day::minutes_since_midnight;
use shared_utils::IsoWeekday;

use crate::error::SlotError;
use crate::models::{AvailabilityRule, AvailabilityWindow, Slot};

/// Expands weekly availability rules into dated slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotGenerator {
    policy: SlotBoundaryPolicy,
    max_horizon_days: Option<u32>,
}

impl SlotGenerator {
    pub fn new(policy: SlotBoundaryPolicy) -> Self {
        Self {
            policy,
            max_horizon_days: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.slot_boundary_policy).with_max_horizon(config.max_horizon_days)
    }

    pub fn with_max_horizon(mut self, max_horizon_days: u32) -> Self {
        self.max_horizon_days = Some(max_horizon_days);
        self
    }

    pub fn policy(&self) -> SlotBoundaryPolicy {
        self.policy
    }

    pub fn max_horizon_days(&self) -> Option<u32> {
        self.max_horizon_days
    }

    pub fn check_horizon(&self, horizon_days: u32) -> Result<u32, SlotError> {
        if horizon_days == 0 {
            return Err(SlotError::EmptyHorizon);
        }
        match self.max_horizon_days {
            Some(max) if horizon_days > max => Err(SlotError::HorizonTooLong {
                requested: horizon_days,
                max,
            }),
            _ => Ok(horizon_days),
        }
    }

    /// Generates slots for `today + 1 ..= today + horizon_days`, sorted by
    /// date then time. Every rule is validated first; one bad rule rejects
    /// the whole call.
    pub fn generate(
        &self,
        rules: &[AvailabilityRule],
        horizon_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<Slot>, SlotError> {
        self.check_horizon(horizon_days)?;
        let windows = validate_rules(rules)?;
        let mut slots = Vec::new();

        if windows.is_empty() {
            return Ok(slots);
        }

        for offset in 1..=horizon_days {
            let Some(date) = today.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            let weekday = IsoWeekday::from(date.weekday());

            for window in windows.iter().filter(|w| w.weekday == weekday) {
                self.expand_window(window, date, &mut slots);
            }
        }

        // stable: same-time slots keep rule order
        slots.sort_by_key(|slot| (slot.date, slot.time));

        debug!(
            "Generated {} slots from {} rules over {} days ({})",
            slots.len(),
            windows.len(),
            horizon_days,
            self.policy
        );

        Ok(slots)
    }

    fn expand_window(&self, window: &AvailabilityWindow, date: NaiveDate, out: &mut Vec<Slot>) {
        let end = minutes_since_midnight(window.end);
        let step = window.slot_duration_minutes;
        let mut cursor = minutes_since_midnight(window.start);

        while cursor < end {
            if self.policy == SlotBoundaryPolicy::WithinWindow && cursor + step > end {
                break;
            }

            let Some(time) = NaiveTime::from_hms_opt(cursor / 60, cursor % 60, 0) else {
                break;
            };

            out.push(Slot {
                provider_id: window.provider_id,
                date,
                time,
                duration_minutes: step,
            });

            cursor += step;
        }
    }
}

/// Generates slots with the default boundary policy.
pub fn generate_slots(
    rules: &[AvailabilityRule],
    horizon_days: u32,
    today: NaiveDate,
) -> Result<Vec<Slot>, SlotError> {
    SlotGenerator::default().generate(rules, horizon_days, today)
}

pub fn validate_rules(rules: &[AvailabilityRule]) -> Result<Vec<AvailabilityWindow>, SlotError> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| AvailabilityWindow::from_rule(index, rule))
        .collect()
}

/// Rejects two windows that share a weekday and intersect in time.
pub fn check_overlaps(windows: &[AvailabilityWindow]) -> Result<(), SlotError> {
    for (first, a) in windows.iter().enumerate() {
        for (offset, b) in windows[first + 1..].iter().enumerate() {
            if a.overlaps(b) {
                return Err(SlotError::OverlappingRules {
                    first,
                    second: first + 1 + offset,
                    weekday: a.weekday,
                });
            }
        }
    }
    Ok(())
}
