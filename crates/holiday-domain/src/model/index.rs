//! Date-keyed index over one calendar.

use std::collections::HashMap;

use super::record::HolidayRecord;

/// Lookup table from date string to the holiday on that date.
///
/// Built once per request from a single upstream response and never mutated
/// afterwards. When the input carries the same date twice, the later record
/// replaces the earlier one without error.
#[derive(Debug, Clone, Default)]
pub struct HolidayIndex {
    by_date: HashMap<String, HolidayRecord>,
}

impl HolidayIndex {
    /// Builds the index in a single pass over `records`.
    pub fn build(records: impl IntoIterator<Item = HolidayRecord>) -> Self {
        let mut by_date = HashMap::new();
        for record in records {
            by_date.insert(record.date.clone(), record);
        }
        Self { by_date }
    }

    /// Returns the holiday on exactly `date`, if any.
    pub fn get(&self, date: &str) -> Option<&HolidayRecord> {
        self.by_date.get(date)
    }

    pub fn contains(&self, date: &str) -> bool {
        self.by_date.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Consumes the index and returns the record for `date`.
    pub fn take(mut self, date: &str) -> Option<HolidayRecord> {
        self.by_date.remove(date)
    }
}
