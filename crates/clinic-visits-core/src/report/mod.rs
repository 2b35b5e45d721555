//! Printable report assembly and table exports.

mod csv;
mod html;

pub use csv::*;

use serde::{Deserialize, Serialize};

use crate::aggregate::{CategoryCount, Statistics};

/// Report format version written into JSON exports.
pub const REPORT_FORMAT_VERSION: &str = "1.0";

/// A printable report, ready for the HTML-to-PDF renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    pub format_version: String,
    pub title: String,
    pub total_visits: usize,
    pub total_rest_days: u64,
    pub gender: ReportSection,
    pub visit_types: ReportSection,
    pub departments: ReportSection,
    pub diseases: ReportSection,
    pub medicines: ReportSection,
}

/// A titled table of counts with percentages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub rows: Vec<ReportRow>,
}

/// One line of a report table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub count: usize,
    /// Share of all visits, one decimal place
    pub percentage: String,
}

/// `count / total * 100` to one decimal. Zero total gives `"0.0"`.
pub fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}

fn section(heading: &str, counts: &[CategoryCount], total: usize) -> ReportSection {
    ReportSection {
        heading: heading.to_string(),
        rows: counts
            .iter()
            .map(|c| ReportRow {
                label: c.label.clone(),
                count: c.count,
                percentage: percentage(c.count, total),
            })
            .collect(),
    }
}

/// Assemble a report document. Pure: no I/O, no clock.
pub fn assemble(
    stats: &Statistics,
    top_disease: &[CategoryCount],
    top_medicine: &[CategoryCount],
    dept_breakdown: &[CategoryCount],
    title: &str,
) -> ReportDocument {
    let total = stats.total;
    ReportDocument {
        format_version: REPORT_FORMAT_VERSION.to_string(),
        title: title.to_string(),
        total_visits: total,
        total_rest_days: stats.total_rest_days,
        gender: section("Jenis Kelamin", &stats.by_gender, total),
        visit_types: section("Jenis Kunjungan", &stats.by_visit_type, total),
        departments: section("Departemen", dept_breakdown, total),
        diseases: section("Penyakit Terbanyak", top_disease, total),
        medicines: section("Obat Terbanyak", top_medicine, total),
    }
}

impl ReportDocument {
    /// Assemble from statistics alone, using their own rankings.
    pub fn from_statistics(stats: &Statistics, title: &str) -> Self {
        assemble(
            stats,
            &stats.top_diseases,
            &stats.top_medicines,
            &stats.by_department,
            title,
        )
    }

    pub fn sections(&self) -> [&ReportSection; 5] {
        [
            &self.gender,
            &self.visit_types,
            &self.departments,
            &self.diseases,
            &self.medicines,
        ]
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render as an HTML fragment.
    pub fn to_html(&self) -> String {
        html::render(self)
    }
}
