//! The holiday record wire shape.

use serde::{Deserialize, Serialize};

/// One entry of a country's yearly holiday calendar.
///
/// Optional fields stay `None` when the provider omits them or sends `null`,
/// and are left out again when the record is encoded, so presence survives a
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRecord {
    /// ISO 8601 calendar date, e.g. `2021-07-05`. Used as the lookup key.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Falls on the same date every year.
    pub fixed: bool,
    /// Applies to the whole country rather than a subset of `counties`.
    pub global: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

impl HolidayRecord {
    /// Creates a record with only the required fields set.
    pub fn new(date: impl Into<String>, fixed: bool, global: bool) -> Self {
        Self {
            date: date.into(),
            local_name: None,
            name: None,
            country_code: None,
            fixed,
            global,
            counties: None,
            launch_year: None,
            types: None,
        }
    }

    pub fn with_names(mut self, local_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self.name = Some(name.into());
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn with_counties(mut self, counties: Vec<String>) -> Self {
        self.counties = Some(counties);
        self
    }

    pub fn with_launch_year(mut self, launch_year: i32) -> Self {
        self.launch_year = Some(launch_year);
        self
    }

    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = Some(types);
        self
    }
}
