//! Holiday data model.
//!
//! This module contains:
//! - `HolidayRecord`, one calendar entry as published by the provider
//! - `HolidayIndex`, a date-keyed lookup table over one calendar

mod index;
#[cfg(test)]
mod index_proptest;
mod record;

pub use index::HolidayIndex;
pub use record::HolidayRecord;
