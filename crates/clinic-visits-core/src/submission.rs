//! Save payloads for the remote store.
//!
//! Records are posted as ordered key/value pairs using the store's snake_case
//! column keys. Each payload carries an idempotency key derived from its
//! content so the store can drop duplicate submissions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{VisitDetails, VisitRecord};
use crate::normalizer::{Field, SourceSchema};

/// Store action for saving a record.
pub const SAVE_ACTION: &str = "save";

/// Form key carrying the content hash.
pub const IDEMPOTENCY_KEY: &str = "idempotency_key";

/// A record ready to post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavePayload {
    /// Ordered form fields, idempotency key last
    pub fields: Vec<(String, String)>,
    /// Hex SHA-256 of the content fields
    pub idempotency_key: String,
}

impl SavePayload {
    /// Build the save payload for a record.
    pub fn from_record(record: &VisitRecord) -> Self {
        let mut fields = record_fields(record);
        let idempotency_key = content_hash(&fields);
        fields.push((IDEMPOTENCY_KEY.to_string(), idempotency_key.clone()));
        Self {
            fields,
            idempotency_key,
        }
    }

    /// Value of a form key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Form fields for a record: action, type, header fields, then subtype fields.
pub fn record_fields(record: &VisitRecord) -> Vec<(String, String)> {
    let visit_type = record.visit_type().sheet_name();
    let mut fields = vec![
        ("action".to_string(), SAVE_ACTION.to_string()),
        ("type".to_string(), visit_type.to_string()),
    ];

    let mut put = |field: Field, value: &str| {
        fields.push((field.key(SourceSchema::SnakeCase).to_string(), value.to_string()));
    };

    put(Field::Date, &record.date);
    put(Field::Company, &record.company);
    put(Field::Department, &record.department);
    put(Field::PersonName, &record.person_name);
    put(Field::Gender, record.gender.label());
    put(Field::VisitType, visit_type);

    match &record.details {
        VisitDetails::Treatment(t) => {
            put(Field::Complaint, &t.complaint);
            put(Field::Action, &t.action);
            put(Field::DiagnosisCategory, &t.diagnosis_category);
            put(Field::DiagnosisName, &t.diagnosis_name);
            put(Field::DiagnosisNote, &t.diagnosis_note);
            put(Field::MedicineCategory, &t.medicine_category);
            put(Field::MedicineName, &t.medicine_name);
            put(Field::MedicineQuantity, &t.medicine_quantity);
            put(Field::MedicineUnit, &t.medicine_unit);
            put(Field::DosageInstructions, &t.dosage_instructions);
            put(Field::RestRequired, t.rest_required.label());
            put(Field::RestDays, &t.rest_days.to_string());
            put(Field::RestNote, &t.rest_note);
        }
        VisitDetails::WorkplaceAccident(a) => {
            put(Field::IncidentLocation, &a.incident_location);
            put(Field::IncidentDescription, &a.incident_description);
        }
        VisitDetails::Consultation(c) => {
            put(Field::Complaint, &c.complaint);
            put(Field::Advice, &c.advice);
        }
    }

    fields
}

/// SHA-256 over `key=value` lines, hex encoded.
pub fn content_hash(fields: &[(String, String)]) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in fields {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
