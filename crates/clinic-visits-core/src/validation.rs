//! Visit form validation.
//!
//! Presence checks only: a required field must be non-blank. Values are not
//! otherwise validated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    AccidentDetails, ConsultationDetails, Gender, RestRequired, TreatmentDetails, VisitDetails,
    VisitRecord, VisitType, PLACEHOLDER,
};
use crate::normalizer::Field;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field is empty: {}", .0.canonical_name())]
    MissingField(Field),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Raw values from a visit entry form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitForm {
    pub visit_type: VisitType,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub complaint: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub diagnosis_category: String,
    #[serde(default)]
    pub diagnosis_name: String,
    #[serde(default)]
    pub diagnosis_note: String,
    #[serde(default)]
    pub medicine_category: String,
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub medicine_quantity: String,
    #[serde(default)]
    pub medicine_unit: String,
    #[serde(default)]
    pub dosage_instructions: String,
    #[serde(default)]
    pub rest_required: String,
    #[serde(default)]
    pub rest_days: String,
    #[serde(default)]
    pub rest_note: String,
    #[serde(default)]
    pub incident_location: String,
    #[serde(default)]
    pub incident_description: String,
    #[serde(default)]
    pub advice: String,
}

impl VisitForm {
    /// Empty form for a visit type.
    pub fn new(visit_type: VisitType) -> Self {
        Self {
            visit_type,
            company: String::new(),
            department: String::new(),
            person_name: String::new(),
            gender: String::new(),
            date: String::new(),
            complaint: String::new(),
            action: String::new(),
            diagnosis_category: String::new(),
            diagnosis_name: String::new(),
            diagnosis_note: String::new(),
            medicine_category: String::new(),
            medicine_name: String::new(),
            medicine_quantity: String::new(),
            medicine_unit: String::new(),
            dosage_instructions: String::new(),
            rest_required: String::new(),
            rest_days: String::new(),
            rest_note: String::new(),
            incident_location: String::new(),
            incident_description: String::new(),
            advice: String::new(),
        }
    }

    /// Required fields for this form's visit type, in form order.
    fn required(&self) -> Vec<(Field, &str)> {
        let mut fields = vec![
            (Field::Company, self.company.as_str()),
            (Field::Department, self.department.as_str()),
            (Field::PersonName, self.person_name.as_str()),
            (Field::Gender, self.gender.as_str()),
            (Field::Date, self.date.as_str()),
        ];
        match self.visit_type {
            VisitType::Treatment => fields.extend([
                (Field::Complaint, self.complaint.as_str()),
                (Field::DiagnosisCategory, self.diagnosis_category.as_str()),
                (Field::DiagnosisName, self.diagnosis_name.as_str()),
            ]),
            VisitType::WorkplaceAccident => fields.extend([
                (Field::IncidentLocation, self.incident_location.as_str()),
                (Field::IncidentDescription, self.incident_description.as_str()),
            ]),
            VisitType::Consultation => {
                fields.push((Field::Complaint, self.complaint.as_str()));
            }
        }
        fields
    }

    /// Check required fields and build a canonical record.
    ///
    /// Reports the first empty required field.
    pub fn validate(&self) -> ValidationResult<VisitRecord> {
        if let Some((field, _)) = self
            .required()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(ValidationError::MissingField(field));
        }

        let details = match self.visit_type {
            VisitType::Treatment => {
                let rest_required = RestRequired::parse(&self.rest_required);
                VisitDetails::Treatment(TreatmentDetails {
                    complaint: or_placeholder(&self.complaint),
                    action: or_placeholder(&self.action),
                    diagnosis_category: or_placeholder(&self.diagnosis_category),
                    diagnosis_name: or_placeholder(&self.diagnosis_name),
                    diagnosis_note: or_placeholder(&self.diagnosis_note),
                    medicine_category: or_placeholder(&self.medicine_category),
                    medicine_name: or_placeholder(&self.medicine_name),
                    medicine_quantity: or_placeholder(&self.medicine_quantity),
                    medicine_unit: or_placeholder(&self.medicine_unit),
                    dosage_instructions: or_placeholder(&self.dosage_instructions),
                    rest_required,
                    rest_days: match rest_required {
                        RestRequired::Yes => self.rest_days.trim().parse().unwrap_or(0),
                        RestRequired::No => 0,
                    },
                    rest_note: or_placeholder(&self.rest_note),
                })
            }
            VisitType::WorkplaceAccident => VisitDetails::WorkplaceAccident(AccidentDetails {
                incident_location: or_placeholder(&self.incident_location),
                incident_description: or_placeholder(&self.incident_description),
            }),
            VisitType::Consultation => VisitDetails::Consultation(ConsultationDetails {
                complaint: or_placeholder(&self.complaint),
                advice: or_placeholder(&self.advice),
            }),
        };

        Ok(VisitRecord {
            row_id: None,
            company: self.company.trim().to_string(),
            department: self.department.trim().to_string(),
            person_name: self.person_name.trim().to_string(),
            gender: Gender::parse(&self.gender),
            date: self.date.trim().to_string(),
            timestamp: PLACEHOLDER.to_string(),
            details,
        })
    }
}

fn or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}
