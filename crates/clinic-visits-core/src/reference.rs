//! Reference catalogs: companies, medicines and diseases.
//!
//! Loaded once from a JSON document and held in memory for the session.
//! Medicine and disease names back the autocomplete on the entry form.

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

use crate::models::Company;

/// Minimum similarity for a fuzzy suggestion.
const MIN_SIMILARITY: f64 = 0.75;

/// Reference data errors.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unknown company: {0}")]
    UnknownCompany(String),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// A named catalog entry with an optional grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl ReferenceItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// All reference lists used by the forms and the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceData {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub medicines: Vec<ReferenceItem>,
    #[serde(default)]
    pub diseases: Vec<ReferenceItem>,
}

/// A ranked suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub category: Option<String>,
    pub score: f64,
}

impl ReferenceData {
    /// Parse reference data from JSON.
    pub fn from_json(json: &str) -> ReferenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn company(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.name == name)
    }

    /// Departments of a company, in stored order.
    pub fn departments(&self, company: &str) -> ReferenceResult<&[String]> {
        self.company(company)
            .map(|c| c.departments.as_slice())
            .ok_or_else(|| ReferenceError::UnknownCompany(company.to_string()))
    }

    pub fn company_names(&self) -> Vec<&str> {
        self.companies.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn suggest_medicines(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        suggest(&self.medicines, query, limit)
    }

    pub fn suggest_diseases(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        suggest(&self.diseases, query, limit)
    }
}

/// Rank catalog entries against a typed query.
///
/// Substring hits score 1.0 and keep catalog order; other entries are scored
/// by fuzzy similarity and kept above [`MIN_SIMILARITY`].
pub fn suggest(items: &[ReferenceItem], query: &str, limit: usize) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Suggestion> = items
        .iter()
        .filter_map(|item| {
            let name = item.name.to_lowercase();
            let score = if name.contains(&query) {
                1.0
            } else {
                fuzzy_match(&query, &name)
            };
            (score >= MIN_SIMILARITY).then(|| Suggestion {
                name: item.name.clone(),
                category: item.category.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

/// Combined fuzzy similarity.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_JSON: &str = r#"{
        "companies": [
            {"name": "PT Maju", "departments": ["Produksi", "Gudang", "HR"]},
            {"name": "PT Jaya", "departments": []}
        ],
        "medicines": [
            {"name": "Paracetamol 500mg", "category": "Analgesik"},
            {"name": "Amoxicillin", "category": "Antibiotik"},
            {"name": "Antasida"}
        ],
        "diseases": [
            {"name": "ISPA", "category": "Pernapasan"},
            {"name": "Dispepsia", "category": "Pencernaan"}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let data = ReferenceData::from_json(REFERENCE_JSON).unwrap();
        assert_eq!(data.company_names(), vec!["PT Maju", "PT Jaya"]);
        assert_eq!(
            data.departments("PT Maju").unwrap(),
            &["Produksi".to_string(), "Gudang".to_string(), "HR".to_string()]
        );
        assert!(data.departments("PT Jaya").unwrap().is_empty());
        assert!(matches!(
            data.departments("PT Lain"),
            Err(ReferenceError::UnknownCompany(_))
        ));
    }

    #[test]
    fn test_suggest_substring_first() {
        let data = ReferenceData::from_json(REFERENCE_JSON).unwrap();
        let hits = data.suggest_medicines("para", 5);
        assert_eq!(hits[0].name, "Paracetamol 500mg");
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[0].category.as_deref(), Some("Analgesik"));
    }

    #[test]
    fn test_suggest_fuzzy() {
        let data = ReferenceData::from_json(REFERENCE_JSON).unwrap();
        let hits = data.suggest_medicines("amoxicilin", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Amoxicillin");
        assert!(hits[0].score < 1.0);
    }

    #[test]
    fn test_suggest_empty_query_and_limit() {
        let data = ReferenceData::from_json(REFERENCE_JSON).unwrap();
        assert!(data.suggest_diseases("  ", 5).is_empty());
        assert!(data.suggest_medicines("a", 1).len() <= 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ReferenceData::from_json("{not json"),
            Err(ReferenceError::JsonParse(_))
        ));
    }
}
