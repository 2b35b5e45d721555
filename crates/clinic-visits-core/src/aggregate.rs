//! Category counts and top-N rankings for charts and reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{is_present, Gender, VisitRecord, VisitType};

/// Departments shown in the department chart.
pub const TOP_DEPARTMENTS: usize = 8;

/// Entries in the disease and medicine rankings.
pub const TOP_RANKING: usize = 10;

/// One bucket of a breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Counts per key, remembering the order keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    buckets: Vec<CategoryCount>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with zero-count buckets so fixed categories keep a stable order.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tally = Self::new();
        for key in keys {
            tally.bucket(key.into());
        }
        tally
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: impl Into<String>) {
        let i = self.bucket(key.into());
        self.buckets[i].count += 1;
    }

    fn bucket(&mut self, key: String) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.buckets.len();
        self.index.insert(key.clone(), i);
        self.buckets.push(CategoryCount {
            label: key,
            count: 0,
        });
        i
    }

    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |&i| self.buckets[i].count)
    }

    /// Sum over all buckets.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Buckets in first-seen order.
    pub fn entries(&self) -> &[CategoryCount] {
        &self.buckets
    }

    /// Every bucket, empty ones included, count descending.
    ///
    /// Ties keep first-seen order.
    pub fn ranked(&self) -> Vec<CategoryCount> {
        let mut ranked = self.buckets.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The `n` largest non-empty buckets, count descending.
    pub fn top(&self, n: usize) -> Vec<CategoryCount> {
        let mut ranked = self.ranked();
        ranked.retain(|b| b.count > 0);
        ranked.truncate(n);
        ranked
    }
}

/// Count records by a single key.
pub fn count_by<F>(records: &[VisitRecord], key_fn: F) -> Tally
where
    F: Fn(&VisitRecord) -> String,
{
    let mut tally = Tally::new();
    for record in records {
        tally.add(key_fn(record));
    }
    tally
}

/// Count records that map to any number of keys.
pub fn count_by_many<F>(records: &[VisitRecord], keys_fn: F) -> Tally
where
    F: Fn(&VisitRecord) -> Vec<String>,
{
    let mut tally = Tally::new();
    for key in records.iter().flat_map(keys_fn) {
        tally.add(key);
    }
    tally
}

/// Visits per gender. Buckets are seeded Male, Female, Unknown.
pub fn gender_breakdown(records: &[VisitRecord]) -> Tally {
    let mut tally = Tally::with_keys(
        [Gender::Male, Gender::Female, Gender::Unknown].map(|g| g.label()),
    );
    for record in records {
        tally.add(record.gender.label());
    }
    tally
}

/// Visits per visit type. Buckets are seeded in sheet order.
pub fn visit_type_breakdown(records: &[VisitRecord]) -> Tally {
    let mut tally = Tally::with_keys(VisitType::ALL.map(|t| t.sheet_name()));
    for record in records {
        tally.add(record.visit_type().sheet_name());
    }
    tally
}

/// Visits per department.
pub fn department_breakdown(records: &[VisitRecord]) -> Tally {
    count_by(records, |r| r.department.clone())
}

/// Treatment visits per diagnosis category. Blank diagnoses are skipped.
pub fn disease_tally(records: &[VisitRecord]) -> Tally {
    count_by_many(records, |r| {
        r.treatment()
            .map(|t| t.diagnosis_category.trim())
            .filter(|d| is_present(d))
            .map(|d| vec![d.to_string()])
            .unwrap_or_default()
    })
}

/// Medicine mentions; a comma-separated field counts once per medicine.
pub fn medicine_tally(records: &[VisitRecord]) -> Tally {
    count_by_many(records, VisitRecord::medicine_names)
}

/// Every derived statistic the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub by_gender: Vec<CategoryCount>,
    pub by_visit_type: Vec<CategoryCount>,
    /// Top departments by visits
    pub by_department: Vec<CategoryCount>,
    pub top_diseases: Vec<CategoryCount>,
    pub top_medicines: Vec<CategoryCount>,
    /// Sum of prescribed rest days over treatment visits
    pub total_rest_days: u64,
}

impl Statistics {
    /// Compute all statistics over a (filtered) record set.
    pub fn compute(records: &[VisitRecord]) -> Self {
        Self {
            total: records.len(),
            by_gender: gender_breakdown(records).ranked(),
            by_visit_type: visit_type_breakdown(records).ranked(),
            by_department: department_breakdown(records).top(TOP_DEPARTMENTS),
            top_diseases: disease_tally(records).top(TOP_RANKING),
            top_medicines: medicine_tally(records).top(TOP_RANKING),
            total_rest_days: records
                .iter()
                .filter_map(|r| r.treatment())
                .map(|t| u64::from(t.rest_days))
                .sum(),
        }
    }
}

/// Parallel label/value arrays for the chart renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl From<&[CategoryCount]> for ChartSeries {
    fn from(counts: &[CategoryCount]) -> Self {
        Self {
            labels: counts.iter().map(|c| c.label.clone()).collect(),
            values: counts.iter().map(|c| c.count).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitDetails;

    fn treatment(department: &str, diagnosis: &str, medicine: &str) -> VisitRecord {
        let mut r =
            VisitRecord::new(VisitType::Treatment, "PT Maju", department, "Budi", "2024-03-15");
        if let VisitDetails::Treatment(t) = &mut r.details {
            t.diagnosis_category = diagnosis.into();
            t.medicine_name = medicine.into();
            t.rest_days = 1;
        }
        r
    }

    #[test]
    fn test_top_ties_keep_first_seen() {
        let mut tally = Tally::new();
        for key in ["b", "a", "a", "c", "b", "d"] {
            tally.add(key);
        }
        let top = tally.top(3);
        let labels: Vec<_> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_medicine_split() {
        let records = vec![
            treatment("Produksi", "Infeksi", "Paracetamol, Amoxicillin"),
            treatment("Produksi", "Demam", "Paracetamol"),
        ];
        let tally = medicine_tally(&records);
        assert_eq!(tally.get("Paracetamol"), 2);
        assert_eq!(tally.get("Amoxicillin"), 1);
    }

    #[test]
    fn test_fixed_breakdowns_keep_order() {
        let mut female = treatment("Gudang", "-", "-");
        female.gender = Gender::Female;
        let records = vec![female];

        let gender = gender_breakdown(&records);
        let labels: Vec<_> = gender.entries().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Laki-laki", "Perempuan", "-"]);
        assert_eq!(gender.get("Perempuan"), 1);

        let types = visit_type_breakdown(&records);
        assert_eq!(types.entries().len(), 3);
        assert_eq!(types.get("Berobat"), 1);
    }

    #[test]
    fn test_statistics_rank_gender_and_visit_type() {
        let mut records = vec![treatment("Gudang", "-", "-")];
        for _ in 0..2 {
            let mut r = VisitRecord::new(VisitType::Consultation, "PT Maju", "HR", "Siti", "-");
            r.gender = Gender::Female;
            records.push(r);
        }

        let stats = Statistics::compute(&records);
        let genders: Vec<_> = stats
            .by_gender
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(genders, vec![("Perempuan", 2), ("-", 1), ("Laki-laki", 0)]);

        let types: Vec<_> = stats.by_visit_type.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(types, vec!["Konsultasi", "Berobat", "Kecelakaan Kerja"]);
    }

    #[test]
    fn test_statistics() {
        let mut records: Vec<VisitRecord> = (0..10)
            .map(|i| treatment(&format!("Dept {}", i), "Infeksi", "Paracetamol"))
            .collect();
        records.push(treatment("Dept 0", "-", "-"));

        let stats = Statistics::compute(&records);
        assert_eq!(stats.total, 11);
        assert_eq!(stats.by_department.len(), TOP_DEPARTMENTS);
        assert_eq!(stats.by_department[0].label, "Dept 0");
        assert_eq!(stats.by_department[0].count, 2);
        assert_eq!(stats.top_diseases, vec![CategoryCount { label: "Infeksi".into(), count: 10 }]);
        assert_eq!(stats.total_rest_days, 11);
    }

    #[test]
    fn test_chart_series() {
        let counts = vec![
            CategoryCount { label: "a".into(), count: 3 },
            CategoryCount { label: "b".into(), count: 1 },
        ];
        let series = ChartSeries::from(counts.as_slice());
        assert_eq!(series.labels, vec!["a", "b"]);
        assert_eq!(series.values, vec![3, 1]);
    }
}
