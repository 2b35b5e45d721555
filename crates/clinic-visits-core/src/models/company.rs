//! Company reference data.

use serde::{Deserialize, Serialize};

/// A client company and its departments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    /// Company name as it appears on visit records
    pub name: String,
    /// Departments in display order (duplicates are kept as given)
    #[serde(default)]
    pub departments: Vec<String>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            departments: Vec::new(),
        }
    }

    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    /// Check if a department belongs to this company.
    pub fn has_department(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_departments_keep_order_and_duplicates() {
        let company = Company::new("PT Maju").with_departments(["Produksi", "Gudang", "Produksi"]);
        assert_eq!(company.departments, vec!["Produksi", "Gudang", "Produksi"]);
        assert!(company.has_department("Gudang"));
        assert!(!company.has_department("gudang"));
    }

    #[test]
    fn test_company_deserialize_without_departments() {
        let company: Company = serde_json::from_str(r#"{"name":"PT Maju"}"#).unwrap();
        assert!(company.departments.is_empty());
    }
}
