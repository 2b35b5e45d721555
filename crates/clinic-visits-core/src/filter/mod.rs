//! Filter engine for report queries.
//!
//! Pipeline: company → department → year/month → name → sort newest first.
//! The filtered set is always rebuilt from the full dataset.

mod dates;

pub use dates::*;

use chrono::Datelike;

use crate::models::{FilterCriteria, VisitRecord};

/// Check whether a single record satisfies the criteria.
///
/// Date filters fail closed: a record without a resolvable date never matches
/// an active year or month filter.
pub fn matches(record: &VisitRecord, criteria: &FilterCriteria) -> bool {
    if let Some(company) = criteria.company_filter() {
        if record.company != company {
            return false;
        }
    }

    if let Some(department) = criteria.department_filter() {
        if record.department != department {
            return false;
        }
    }

    if criteria.has_date_filter() {
        let Some(date) = resolve_date(record) else {
            return false;
        };
        if criteria.year.is_some_and(|y| date.year() != y) {
            return false;
        }
        if criteria.month.is_some_and(|m| date.month() != m) {
            return false;
        }
    }

    if let Some(name) = criteria.name_filter() {
        if !record.person_name.trim().to_lowercase().contains(&name) {
            return false;
        }
    }

    true
}

/// Apply criteria and sort the result newest first.
pub fn filter_records(records: &[VisitRecord], criteria: &FilterCriteria) -> Vec<VisitRecord> {
    let mut filtered: Vec<VisitRecord> = records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect();
    sort_newest_first(&mut filtered);
    filtered
}

/// Sort by resolved date, newest first.
///
/// Records without a resolvable date go after all dated records. The sort is
/// stable, so undated records keep their relative input order.
pub fn sort_newest_first(records: &mut [VisitRecord]) {
    records.sort_by_cached_key(|r| std::cmp::Reverse(resolve_date(r)));
}
