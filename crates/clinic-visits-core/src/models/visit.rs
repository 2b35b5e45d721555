//! Visit record models.
//!
//! A visit record is one logged encounter at the company clinic. Every record
//! carries the shared header fields plus exactly one subtype payload
//! ([`VisitDetails`]), so the visit type can never disagree with the fields
//! that are present.

use serde::{Deserialize, Serialize};

/// Literal substituted for any field the store did not provide.
pub const PLACEHOLDER: &str = "-";

/// The three kinds of visit, one per store sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VisitType {
    /// Sick visit with diagnosis and medication
    Treatment,
    /// Injury at the workplace
    WorkplaceAccident,
    /// Advice-only consultation
    Consultation,
}

impl VisitType {
    /// All visit types in sheet order.
    pub const ALL: [VisitType; 3] = [
        VisitType::Treatment,
        VisitType::WorkplaceAccident,
        VisitType::Consultation,
    ];

    /// Name of the sheet (and display label) holding this visit type.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            VisitType::Treatment => "Berobat",
            VisitType::WorkplaceAccident => "Kecelakaan Kerja",
            VisitType::Consultation => "Konsultasi",
        }
    }

    /// Re-derive a visit type from a free-form label.
    ///
    /// Accepts sheet names as well as the English variant names, in any case.
    pub fn parse(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if lower.contains("berobat") || lower.contains("treatment") || lower.contains("pengobatan")
        {
            Some(VisitType::Treatment)
        } else if lower.contains("kecelakaan") || lower.contains("accident") {
            Some(VisitType::WorkplaceAccident)
        } else if lower.contains("konsultasi") || lower.contains("consultation") {
            Some(VisitType::Consultation)
        } else {
            None
        }
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Gender as recorded on the visit form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Laki-laki",
            Gender::Female => "Perempuan",
            Gender::Unknown => PLACEHOLDER,
        }
    }

    /// Parse a store value. Anything unrecognised is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "laki-laki" | "laki laki" | "l" | "pria" | "male" | "m" => Gender::Male,
            "perempuan" | "p" | "wanita" | "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// Whether the patient was sent home to rest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RestRequired {
    Yes,
    No,
}

impl RestRequired {
    pub fn label(&self) -> &'static str {
        match self {
            RestRequired::Yes => "Ya",
            RestRequired::No => "Tidak",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "ya" | "yes" | "y" | "true" | "1" => RestRequired::Yes,
            _ => RestRequired::No,
        }
    }
}

/// A single visit record in canonical shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRecord {
    /// Store row number, when the store reported one (needed for deletion)
    pub row_id: Option<u32>,
    /// Company the person works for
    pub company: String,
    /// Department within the company
    pub department: String,
    /// Name of the employee who visited
    pub person_name: String,
    /// Gender of the employee
    pub gender: Gender,
    /// Visit date as entered (format not fixed)
    pub date: String,
    /// Submission timestamp written by the store (format not fixed)
    pub timestamp: String,
    /// Subtype-specific fields
    pub details: VisitDetails,
}

/// Subtype payload of a visit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VisitDetails {
    Treatment(TreatmentDetails),
    WorkplaceAccident(AccidentDetails),
    Consultation(ConsultationDetails),
}

/// Fields specific to a treatment visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentDetails {
    pub complaint: String,
    pub action: String,
    pub diagnosis_category: String,
    pub diagnosis_name: String,
    pub diagnosis_note: String,
    pub medicine_category: String,
    /// Comma-separated when more than one medicine was given
    pub medicine_name: String,
    pub medicine_quantity: String,
    pub medicine_unit: String,
    pub dosage_instructions: String,
    pub rest_required: RestRequired,
    pub rest_days: u32,
    pub rest_note: String,
}

/// Fields specific to a workplace accident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccidentDetails {
    pub incident_location: String,
    pub incident_description: String,
}

/// Fields specific to a consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationDetails {
    pub complaint: String,
    pub advice: String,
}

impl VisitDetails {
    /// Empty payload for a visit type, every text field set to the placeholder.
    pub fn placeholder(visit_type: VisitType) -> Self {
        let p = || PLACEHOLDER.to_string();
        match visit_type {
            VisitType::Treatment => VisitDetails::Treatment(TreatmentDetails {
                complaint: p(),
                action: p(),
                diagnosis_category: p(),
                diagnosis_name: p(),
                diagnosis_note: p(),
                medicine_category: p(),
                medicine_name: p(),
                medicine_quantity: p(),
                medicine_unit: p(),
                dosage_instructions: p(),
                rest_required: RestRequired::No,
                rest_days: 0,
                rest_note: p(),
            }),
            VisitType::WorkplaceAccident => VisitDetails::WorkplaceAccident(AccidentDetails {
                incident_location: p(),
                incident_description: p(),
            }),
            VisitType::Consultation => VisitDetails::Consultation(ConsultationDetails {
                complaint: p(),
                advice: p(),
            }),
        }
    }

    pub fn visit_type(&self) -> VisitType {
        match self {
            VisitDetails::Treatment(_) => VisitType::Treatment,
            VisitDetails::WorkplaceAccident(_) => VisitType::WorkplaceAccident,
            VisitDetails::Consultation(_) => VisitType::Consultation,
        }
    }
}

impl VisitRecord {
    /// Create a record with header fields set and a placeholder payload.
    pub fn new(
        visit_type: VisitType,
        company: impl Into<String>,
        department: impl Into<String>,
        person_name: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            row_id: None,
            company: company.into(),
            department: department.into(),
            person_name: person_name.into(),
            gender: Gender::Unknown,
            date: date.into(),
            timestamp: PLACEHOLDER.to_string(),
            details: VisitDetails::placeholder(visit_type),
        }
    }

    pub fn visit_type(&self) -> VisitType {
        self.details.visit_type()
    }

    /// Treatment payload, if this is a treatment visit.
    pub fn treatment(&self) -> Option<&TreatmentDetails> {
        match &self.details {
            VisitDetails::Treatment(t) => Some(t),
            _ => None,
        }
    }

    /// Complaint text for treatment and consultation visits.
    pub fn complaint(&self) -> Option<&str> {
        match &self.details {
            VisitDetails::Treatment(t) => Some(&t.complaint),
            VisitDetails::Consultation(c) => Some(&c.complaint),
            VisitDetails::WorkplaceAccident(_) => None,
        }
    }

    /// One-line description used in table rows.
    pub fn summary(&self) -> &str {
        match &self.details {
            VisitDetails::Treatment(t) if is_present(&t.diagnosis_name) => &t.diagnosis_name,
            VisitDetails::Treatment(t) => &t.complaint,
            VisitDetails::WorkplaceAccident(a) => &a.incident_description,
            VisitDetails::Consultation(c) => &c.complaint,
        }
    }

    /// Individual medicine names, split from the comma-separated store field.
    pub fn medicine_names(&self) -> Vec<String> {
        self.treatment()
            .map(|t| split_list(&t.medicine_name))
            .unwrap_or_default()
    }
}

/// True when a field holds a real value rather than nothing or the placeholder.
pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != PLACEHOLDER
}

/// Split a comma-separated field into trimmed, non-placeholder entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| is_present(s))
        .map(str::to_string)
        .collect()
}
