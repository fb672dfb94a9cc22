pub mod availability;
pub mod slots;

pub use availability::AvailabilityService;
pub use slots::{check_overlaps, generate_slots, validate_rules, SlotGenerator};
