pub mod test_utils;
pub mod time_of_day;
pub mod weekday;

pub use time_of_day::{format_hhmm, parse_hhmm, TimeFormatError};
pub use weekday::{IsoWeekday, WeekdayError};
