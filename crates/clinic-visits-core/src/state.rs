//! Dashboard state container.
//!
//! Holds the full dataset plus the current criteria, filtered view and page.
//! Every criteria or dataset change recomputes the filtered view from scratch
//! and resets paging; everything else is a pure read of that state.

use crate::aggregate::{ChartSeries, Statistics};
use crate::filter::filter_records;
use crate::models::{FilterCriteria, VisitRecord};
use crate::paginate::{page_count, render_page, Pager, RowDescriptor, DEFAULT_PAGE_SIZE};
use crate::report::{records_to_csv, ReportDocument};

/// State behind the report dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<VisitRecord>,
    criteria: FilterCriteria,
    filtered: Vec<VisitRecord>,
    pager: Pager,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Dashboard {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            pager: Pager::new(page_size),
        }
    }

    /// Replace the full dataset, as after a store refresh.
    pub fn set_records(&mut self, records: Vec<VisitRecord>) {
        self.records = records;
        self.recompute();
    }

    /// Apply new criteria.
    pub fn apply(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = filter_records(&self.records, &self.criteria);
        self.pager.reset();
        tracing::debug!(
            total = self.records.len(),
            matched = self.filtered.len(),
            "dashboard filter applied"
        );
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn filtered(&self) -> &[VisitRecord] {
        &self.filtered
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len(), self.pager.page_size())
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to(page, self.filtered.len());
    }

    pub fn next_page(&mut self) {
        self.pager.next(self.filtered.len());
    }

    pub fn previous_page(&mut self) {
        self.pager.previous(self.filtered.len());
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<RowDescriptor> {
        render_page(&self.filtered, self.pager.current(), self.pager.page_size())
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.filtered)
    }

    /// Chart inputs: gender, visit type, department.
    pub fn charts(&self) -> DashboardCharts {
        let stats = self.statistics();
        DashboardCharts {
            gender: ChartSeries::from(stats.by_gender.as_slice()),
            visit_type: ChartSeries::from(stats.by_visit_type.as_slice()),
            department: ChartSeries::from(stats.by_department.as_slice()),
        }
    }

    pub fn report(&self, title: &str) -> ReportDocument {
        ReportDocument::from_statistics(&self.statistics(), title)
    }

    /// Filtered table as CSV.
    pub fn export_csv(&self) -> String {
        records_to_csv(&self.filtered)
    }
}

/// Series handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DashboardCharts {
    pub gender: ChartSeries,
    pub visit_type: ChartSeries,
    pub department: ChartSeries,
}
