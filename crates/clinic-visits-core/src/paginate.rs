//! Page slicing and table row descriptors.

use serde::{Deserialize, Serialize};

use crate::models::VisitRecord;

/// Rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Message shown in place of rows when nothing matches.
pub const NO_DATA_MESSAGE: &str = "Tidak ada data";

/// Split items into pages of `page_size`. The last page may be shorter.
///
/// A `page_size` of zero is treated as one.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    items.chunks(page_size.max(1)).collect()
}

/// Number of pages needed for `total` items. Never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Current page of a table view. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Back to page 1, as after any filter change.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Jump to `page`, clamped to the valid range for `total` items.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.current = page.clamp(1, page_count(total, self.page_size));
    }

    pub fn next(&mut self, total: usize) {
        self.go_to(self.current + 1, total);
    }

    pub fn previous(&mut self, total: usize) {
        self.go_to(self.current.saturating_sub(1), total);
    }

    /// Index range of the current page within `total` items.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        page_range(self.current, self.page_size, total)
    }
}

/// One rendered table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RowDescriptor {
    Visit {
        /// 1-based position in the whole filtered set
        number: usize,
        row_id: Option<u32>,
        date: String,
        person_name: String,
        company: String,
        department: String,
        gender: String,
        visit_type: String,
        summary: String,
    },
    /// Single row shown when there is nothing to list
    Placeholder { message: String },
}

impl RowDescriptor {
    fn from_record(number: usize, record: &VisitRecord) -> Self {
        RowDescriptor::Visit {
            number,
            row_id: record.row_id,
            date: record.date.clone(),
            person_name: record.person_name.clone(),
            company: record.company.clone(),
            department: record.department.clone(),
            gender: record.gender.label().to_string(),
            visit_type: record.visit_type().sheet_name().to_string(),
            summary: record.summary().to_string(),
        }
    }
}

/// Index range `[(page-1)*size, page*size)` cut to `total`. Page 0 is empty.
fn page_range(page: usize, page_size: usize, total: usize) -> std::ops::Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Rows of page `page` (1-based).
///
/// An empty page, including one past the end, yields one placeholder row,
/// never zero rows.
pub fn render_page(records: &[VisitRecord], page: usize, page_size: usize) -> Vec<RowDescriptor> {
    let range = page_range(page, page_size, records.len());

    if range.is_empty() {
        return vec![RowDescriptor::Placeholder {
            message: NO_DATA_MESSAGE.to_string(),
        }];
    }

    let offset = range.start;
    records[range]
        .iter()
        .enumerate()
        .map(|(i, record)| RowDescriptor::from_record(offset + i + 1, record))
        .collect()
}
