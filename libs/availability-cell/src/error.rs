use thiserror::Error;

use shared_models::error::AppError;
use shared_utils::{IsoWeekday, TimeFormatError, WeekdayError};

/// Rejections raised while validating availability rules or generating slots.
/// `index` is the position of the offending rule in the submitted list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("rule {index}: invalid {field}: {source}")]
    InvalidTime {
        index: usize,
        field: &'static str,
        source: TimeFormatError,
    },

    #[error("rule {index}: {source}")]
    InvalidWeekday { index: usize, source: WeekdayError },

    #[error("rule {index}: end time {end} must be after start time {start}")]
    EmptyWindow { index: usize, start: String, end: String },

    #[error("rule {index}: slot duration must be a positive number of minutes, got {minutes}")]
    InvalidSlotDuration { index: usize, minutes: i32 },

    #[error("horizon must be at least one day")]
    EmptyHorizon,

    #[error("horizon of {requested} days exceeds the maximum of {max}")]
    HorizonTooLong { requested: u32, max: u32 },

    #[error("rules {first} and {second} overlap on {weekday}")]
    OverlappingRules {
        first: usize,
        second: usize,
        weekday: IsoWeekday,
    },
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
