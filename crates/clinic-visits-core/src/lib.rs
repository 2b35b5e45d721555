//! Clinic-Visits Core Library
//!
//! Visit logging and reporting for company clinics. Records live in a remote
//! spreadsheet-backed store; this crate shapes them for forms and reports.
//!
//! # Architecture
//!
//! ```text
//!   Entry form ──► Validation ──► Save payload ──► Remote store (HTTP)
//!                                                       │
//!                                               fetch all three sheets
//!                                                       │
//!                                                       ▼
//!                                               Record Normalizer
//!                                                       │
//!                                             [Dashboard: full dataset]
//!                                                       │
//!                                   criteria change ──► Filter Engine
//!                                                       │
//!                             ┌─────────────────────────┼─────────────────────┐
//!                             ▼                         ▼                     ▼
//!                        Pagination                Aggregator          Report Assembler
//!                        (table rows)             (chart series)        (HTML / JSON)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (VisitRecord, Company, FilterCriteria, RemoteConfig)
//! - [`normalizer`]: Raw store rows to canonical records
//! - [`filter`]: Multi-criteria filtering and date resolution
//! - [`aggregate`]: Category counts and top-N rankings
//! - [`paginate`]: Page slicing and table rows
//! - [`report`]: Printable report assembly and CSV export
//! - [`reference`]: Company, medicine and disease catalogs
//! - [`validation`]: Entry form presence checks
//! - [`submission`]: Save payloads with idempotency keys
//! - [`state`]: Dashboard state container
//! - [`db`]: SQLite settings store

pub mod aggregate;
pub mod db;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod paginate;
pub mod reference;
pub mod report;
pub mod state;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use aggregate::{CategoryCount, ChartSeries, Statistics, Tally};
pub use db::Database;
pub use models::{
    Company, FilterCriteria, Gender, RemoteConfig, RestRequired, VisitDetails, VisitRecord,
    VisitType,
};
pub use normalizer::{Normalizer, RawRow};
pub use report::ReportDocument;
pub use state::Dashboard;
pub use submission::SavePayload;
pub use validation::{ValidationError, VisitForm};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicVisitsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<db::DbError> for ClinicVisitsError {
    fn from(e: db::DbError) -> Self {
        ClinicVisitsError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicVisitsError {
    fn from(e: serde_json::Error) -> Self {
        ClinicVisitsError::SerializationError(e.to_string())
    }
}

impl From<validation::ValidationError> for ClinicVisitsError {
    fn from(e: validation::ValidationError) -> Self {
        ClinicVisitsError::ValidationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicVisitsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicVisitsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the settings database at the given path.
#[uniffi::export]
pub fn open_clinic_visits(path: String) -> Result<Arc<ClinicVisitsCore>, ClinicVisitsError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(ClinicVisitsCore::with_database(db)))
}

/// Open with an in-memory settings database (for testing).
#[uniffi::export]
pub fn open_clinic_visits_in_memory() -> Result<Arc<ClinicVisitsCore>, ClinicVisitsError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ClinicVisitsCore::with_database(db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe core wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicVisitsCore {
    db: Arc<Mutex<Database>>,
    dashboard: Arc<Mutex<Dashboard>>,
    normalizer: Normalizer,
}

impl ClinicVisitsCore {
    fn with_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            dashboard: Arc::new(Mutex::new(Dashboard::default())),
            normalizer: Normalizer::new(),
        }
    }

    fn parse_rows(json: &str) -> Result<Vec<RawRow>, ClinicVisitsError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::Object(row) => Some(row),
                _ => None,
            })
            .collect())
    }
}

#[uniffi::export]
impl ClinicVisitsCore {
    // =========================================================================
    // Settings
    // =========================================================================

    pub fn selected_company(&self) -> Result<Option<String>, ClinicVisitsError> {
        let db = self.db.lock()?;
        Ok(db.selected_company()?)
    }

    pub fn set_selected_company(&self, company: String) -> Result<(), ClinicVisitsError> {
        let db = self.db.lock()?;
        db.set_selected_company(&company)?;
        Ok(())
    }

    pub fn remote_config(&self) -> Result<FfiRemoteConfig, ClinicVisitsError> {
        let db = self.db.lock()?;
        Ok(db.remote_config()?.into())
    }

    pub fn set_remote_config(&self, config: FfiRemoteConfig) -> Result<(), ClinicVisitsError> {
        let db = self.db.lock()?;
        db.set_remote_config(&config.into())?;
        Ok(())
    }

    // =========================================================================
    // Dataset & Filtering
    // =========================================================================

    /// Replace the dataset with the three sheets' raw rows (JSON arrays).
    ///
    /// Returns the number of records loaded.
    pub fn load_sheets(
        &self,
        treatment_json: String,
        accident_json: String,
        consultation_json: String,
    ) -> Result<u32, ClinicVisitsError> {
        let mut records = Vec::new();
        for (json, visit_type) in [
            (&treatment_json, VisitType::Treatment),
            (&accident_json, VisitType::WorkplaceAccident),
            (&consultation_json, VisitType::Consultation),
        ] {
            let rows = Self::parse_rows(json)?;
            records.extend(self.normalizer.normalize_sheet(&rows, visit_type));
        }

        let count = records.len() as u32;
        self.dashboard.lock()?.set_records(records);
        Ok(count)
    }

    /// Apply filter selector values ("" or "all" for no filter).
    pub fn apply_filter(
        &self,
        company: String,
        department: String,
        year: String,
        month: String,
        name: String,
    ) -> Result<u32, ClinicVisitsError> {
        let criteria = FilterCriteria::from_selectors(&company, &department, &year, &month, &name);
        let mut dashboard = self.dashboard.lock()?;
        dashboard.apply(criteria);
        Ok(dashboard.filtered().len() as u32)
    }

    pub fn page_count(&self) -> Result<u32, ClinicVisitsError> {
        Ok(self.dashboard.lock()?.page_count() as u32)
    }

    /// Jump to a 1-based page; pages past the end clamp to the last one.
    pub fn go_to_page(&self, page: u32) -> Result<u32, ClinicVisitsError> {
        if page == 0 {
            return Err(ClinicVisitsError::InvalidInput(
                "Pages are numbered from 1".to_string(),
            ));
        }
        let mut dashboard = self.dashboard.lock()?;
        dashboard.go_to_page(page as usize);
        Ok(dashboard.current_page() as u32)
    }

    pub fn page_rows(&self) -> Result<Vec<FfiTableRow>, ClinicVisitsError> {
        let dashboard = self.dashboard.lock()?;
        Ok(dashboard.page_rows().into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Charts & Reports
    // =========================================================================

    pub fn statistics_json(&self) -> Result<String, ClinicVisitsError> {
        let dashboard = self.dashboard.lock()?;
        Ok(serde_json::to_string(&dashboard.statistics())?)
    }

    pub fn charts_json(&self) -> Result<String, ClinicVisitsError> {
        let dashboard = self.dashboard.lock()?;
        Ok(serde_json::to_string(&dashboard.charts())?)
    }

    pub fn report_html(&self, title: String) -> Result<String, ClinicVisitsError> {
        let dashboard = self.dashboard.lock()?;
        Ok(dashboard.report(&title).to_html())
    }

    pub fn report_json(&self, title: String) -> Result<String, ClinicVisitsError> {
        let dashboard = self.dashboard.lock()?;
        Ok(dashboard.report(&title).to_json()?)
    }

    pub fn export_csv(&self) -> Result<String, ClinicVisitsError> {
        Ok(self.dashboard.lock()?.export_csv())
    }

    // =========================================================================
    // Entry Forms
    // =========================================================================

    /// Validate a form (JSON) and build its save payload.
    pub fn build_save_payload(
        &self,
        form_json: String,
    ) -> Result<FfiSavePayload, ClinicVisitsError> {
        let form: VisitForm = serde_json::from_str(&form_json)?;
        let record = form.validate()?;
        Ok(SavePayload::from_record(&record).into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe remote store configuration.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRemoteConfig {
    pub enabled: bool,
    pub url: String,
    pub sync_enabled: bool,
}

impl From<RemoteConfig> for FfiRemoteConfig {
    fn from(config: RemoteConfig) -> Self {
        Self {
            enabled: config.enabled,
            url: config.url,
            sync_enabled: config.sync_enabled,
        }
    }
}

impl From<FfiRemoteConfig> for RemoteConfig {
    fn from(config: FfiRemoteConfig) -> Self {
        RemoteConfig {
            enabled: config.enabled,
            url: config.url,
            sync_enabled: config.sync_enabled,
        }
    }
}

/// FFI-safe table row. Placeholder rows carry only `message`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTableRow {
    pub is_placeholder: bool,
    pub number: u32,
    pub row_id: Option<u32>,
    pub date: String,
    pub person_name: String,
    pub company: String,
    pub department: String,
    pub gender: String,
    pub visit_type: String,
    pub summary: String,
    pub message: Option<String>,
}

impl From<paginate::RowDescriptor> for FfiTableRow {
    fn from(row: paginate::RowDescriptor) -> Self {
        match row {
            paginate::RowDescriptor::Visit {
                number,
                row_id,
                date,
                person_name,
                company,
                department,
                gender,
                visit_type,
                summary,
            } => Self {
                is_placeholder: false,
                number: number as u32,
                row_id,
                date,
                person_name,
                company,
                department,
                gender,
                visit_type,
                summary,
                message: None,
            },
            paginate::RowDescriptor::Placeholder { message } => Self {
                is_placeholder: true,
                number: 0,
                row_id: None,
                date: String::new(),
                person_name: String::new(),
                company: String::new(),
                department: String::new(),
                gender: String::new(),
                visit_type: String::new(),
                summary: String::new(),
                message: Some(message),
            },
        }
    }
}

/// FFI-safe form field.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormField {
    pub key: String,
    pub value: String,
}

/// FFI-safe save payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSavePayload {
    pub fields: Vec<FfiFormField>,
    pub idempotency_key: String,
}

impl From<SavePayload> for FfiSavePayload {
    fn from(payload: SavePayload) -> Self {
        Self {
            fields: payload
                .fields
                .into_iter()
                .map(|(key, value)| FfiFormField { key, value })
                .collect(),
            idempotency_key: payload.idempotency_key,
        }
    }
}
