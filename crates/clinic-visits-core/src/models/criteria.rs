//! Report filter criteria.

use serde::{Deserialize, Serialize};

/// Selector value meaning "do not filter on this field".
pub const ALL_SENTINEL: &str = "all";

/// A transient report query. Absent fields do not filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    pub company: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    /// Month of year, 1-12
    pub month: Option<u32>,
    /// Case-insensitive substring of the person's name
    pub name: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from raw selector values.
    ///
    /// Empty strings and the `"all"` sentinel mean "no filter". Year and month
    /// values that are not numbers, or a month outside 1-12, are ignored.
    pub fn from_selectors(
        company: &str,
        department: &str,
        year: &str,
        month: &str,
        name: &str,
    ) -> Self {
        Self {
            company: selector(company),
            department: selector(department),
            year: selector(year).and_then(|y| y.parse().ok()),
            month: selector(month)
                .and_then(|m| m.parse().ok())
                .filter(|m| (1..=12).contains(m)),
            name: selector(name),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when a year or month filter is active.
    pub fn has_date_filter(&self) -> bool {
        self.year.is_some() || self.month.is_some()
    }

    /// The company filter, if one is active.
    pub fn company_filter(&self) -> Option<&str> {
        active(self.company.as_deref())
    }

    /// The department filter, if one is active.
    pub fn department_filter(&self) -> Option<&str> {
        active(self.department.as_deref())
    }

    /// The name filter, lowercased, if one is active.
    pub fn name_filter(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
    }
}

fn selector(value: &str) -> Option<String> {
    active(Some(value)).map(str::to_string)
}

fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL))
}
