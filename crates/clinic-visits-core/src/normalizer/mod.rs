//! Record normalizer.
//!
//! Maps raw store rows, whose column names vary by source schema, into
//! canonical [`VisitRecord`]s. Normalization is total: missing fields become
//! the `"-"` placeholder, never an error.

mod fields;

pub use fields::*;

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{
    AccidentDetails, ConsultationDetails, Gender, RestRequired, TreatmentDetails, VisitDetails,
    VisitRecord, VisitType, PLACEHOLDER,
};

/// A raw row as returned by the store: column name → cell value.
pub type RawRow = serde_json::Map<String, Value>;

/// Normalizer for raw store rows.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    /// Extra source keys tried after the built-in ones
    extra_keys: HashMap<Field, Vec<String>>,
}

impl Normalizer {
    /// Create a normalizer with the built-in key table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional source key for a field.
    ///
    /// Extra keys are tried after every built-in spelling, in the order added.
    pub fn add_key(&mut self, field: Field, key: &str) {
        self.extra_keys
            .entry(field)
            .or_default()
            .push(key.to_string());
    }

    /// Normalize one row read from the sheet of `visit_type`.
    pub fn normalize(&self, raw: &RawRow, visit_type: VisitType) -> VisitRecord {
        let details = match visit_type {
            VisitType::Treatment => VisitDetails::Treatment(TreatmentDetails {
                complaint: self.text(raw, Field::Complaint),
                action: self.text(raw, Field::Action),
                diagnosis_category: self.text(raw, Field::DiagnosisCategory),
                diagnosis_name: self.text(raw, Field::DiagnosisName),
                diagnosis_note: self.text(raw, Field::DiagnosisNote),
                medicine_category: self.text(raw, Field::MedicineCategory),
                medicine_name: self.text(raw, Field::MedicineName),
                medicine_quantity: self.text(raw, Field::MedicineQuantity),
                medicine_unit: self.text(raw, Field::MedicineUnit),
                dosage_instructions: self.text(raw, Field::DosageInstructions),
                rest_required: RestRequired::parse(&self.text(raw, Field::RestRequired)),
                rest_days: self
                    .lookup(raw, Field::RestDays)
                    .and_then(|d| parse_count(&d))
                    .unwrap_or(0),
                rest_note: self.text(raw, Field::RestNote),
            }),
            VisitType::WorkplaceAccident => VisitDetails::WorkplaceAccident(AccidentDetails {
                incident_location: self.text(raw, Field::IncidentLocation),
                incident_description: self.text(raw, Field::IncidentDescription),
            }),
            VisitType::Consultation => VisitDetails::Consultation(ConsultationDetails {
                complaint: self.text(raw, Field::Complaint),
                advice: self.text(raw, Field::Advice),
            }),
        };

        VisitRecord {
            row_id: self.lookup(raw, Field::RowId).and_then(|r| parse_count(&r)),
            company: self.text(raw, Field::Company),
            department: self.text(raw, Field::Department),
            person_name: self.text(raw, Field::PersonName),
            gender: Gender::parse(&self.text(raw, Field::Gender)),
            date: self.text(raw, Field::Date),
            timestamp: self.text(raw, Field::Timestamp),
            details,
        }
    }

    /// Normalize a row whose sheet is unknown.
    ///
    /// The visit type is re-derived from the row's visit-type column, falling
    /// back to `fallback` when that column is missing or unrecognised.
    pub fn normalize_untyped(&self, raw: &RawRow, fallback: VisitType) -> VisitRecord {
        let visit_type = self.infer_visit_type(raw).unwrap_or(fallback);
        self.normalize(raw, visit_type)
    }

    /// Normalize every row of one sheet.
    pub fn normalize_sheet(&self, rows: &[RawRow], visit_type: VisitType) -> Vec<VisitRecord> {
        if let Some(first) = rows.first() {
            tracing::debug!(
                sheet = visit_type.sheet_name(),
                rows = rows.len(),
                schema = ?detect_schema(first),
                "normalizing sheet"
            );
        }
        rows.iter().map(|row| self.normalize(row, visit_type)).collect()
    }

    /// Read the visit-type column of a row.
    pub fn infer_visit_type(&self, raw: &RawRow) -> Option<VisitType> {
        self.lookup(raw, Field::VisitType)
            .and_then(|label| VisitType::parse(&label))
    }

    /// First present value for a field, trying keys in fixed precedence.
    pub fn lookup(&self, raw: &RawRow, field: Field) -> Option<String> {
        for schema in SourceSchema::PRECEDENCE {
            if let Some(value) = raw.get(field.key(schema)).and_then(cell_text) {
                return Some(value);
            }
        }

        self.extra_keys
            .get(&field)?
            .iter()
            .find_map(|key| raw.get(key.as_str()).and_then(cell_text))
    }

    /// Field value, or the placeholder when absent.
    pub fn text(&self, raw: &RawRow, field: Field) -> String {
        self.lookup(raw, field)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// Guess which schema a row was written with, by counting matching keys.
///
/// Ties go to the earlier schema in precedence order.
pub fn detect_schema(raw: &RawRow) -> Option<SourceSchema> {
    let mut best: Option<(SourceSchema, usize)> = None;
    for schema in SourceSchema::PRECEDENCE {
        let hits = Field::ALL
            .iter()
            .filter(|f| raw.contains_key(f.key(schema)))
            .count();
        if hits > 0 && best.map_or(true, |(_, n)| hits > n) {
            best = Some((schema, hits));
        }
    }
    best.map(|(schema, _)| schema)
}

/// Cell value as trimmed text. Empty cells count as absent.
fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a non-negative whole count ("3", "3.0", "2 hari").
fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = digits.parse().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_normalize_sheet_headers() {
        let normalizer = Normalizer::new();
        let raw = row(json!({
            "Tanggal": "2024-03-15",
            "Perusahaan": "PT Maju",
            "Departemen": "Produksi",
            "Nama": "Budi",
            "Jenis Kelamin": "Laki-laki",
            "Keluhan": "Demam",
            "Kategori Diagnosa": "Infeksi",
            "Nama Obat": "Paracetamol, Amoxicillin",
            "Perlu Istirahat": "Ya",
            "Lama Istirahat": 2
        }));

        let record = normalizer.normalize(&raw, VisitType::Treatment);
        assert_eq!(record.company, "PT Maju");
        assert_eq!(record.department, "Produksi");
        assert_eq!(record.person_name, "Budi");
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.date, "2024-03-15");
        assert_eq!(record.timestamp, PLACEHOLDER);

        let t = record.treatment().unwrap();
        assert_eq!(t.complaint, "Demam");
        assert_eq!(t.diagnosis_category, "Infeksi");
        assert_eq!(t.action, PLACEHOLDER);
        assert_eq!(t.rest_required, RestRequired::Yes);
        assert_eq!(t.rest_days, 2);
    }

    #[test]
    fn test_header_wins_over_snake_case() {
        let normalizer = Normalizer::new();
        let raw = row(json!({
            "perusahaan": "lower",
            "Perusahaan": "Header",
            "jenis_kelamin": "Perempuan",
            "jenisKelamin": "Laki-laki"
        }));

        let record = normalizer.normalize(&raw, VisitType::Consultation);
        assert_eq!(record.company, "Header");
        assert_eq!(record.gender, Gender::Female);
    }

    #[test]
    fn test_empty_cell_falls_through() {
        let normalizer = Normalizer::new();
        let raw = row(json!({ "Nama": "  ", "nama": "Siti" }));
        assert_eq!(normalizer.text(&raw, Field::PersonName), "Siti");
    }

    #[test]
    fn test_normalize_is_total() {
        let normalizer = Normalizer::new();
        let raw = RawRow::new();
        for visit_type in VisitType::ALL {
            let record = normalizer.normalize(&raw, visit_type);
            assert_eq!(record.visit_type(), visit_type);
            assert_eq!(record.company, PLACEHOLDER);
            assert_eq!(record.gender, Gender::Unknown);
            assert_eq!(record.row_id, None);
        }
    }

    #[test]
    fn test_accident_and_consultation_fields() {
        let normalizer = Normalizer::new();
        let raw = row(json!({
            "lokasi_kejadian": "Gudang",
            "deskripsiKejadian": "Tersandung",
            "Saran": "Istirahat cukup",
            "keluhan": "Lelah"
        }));

        match normalizer.normalize(&raw, VisitType::WorkplaceAccident).details {
            VisitDetails::WorkplaceAccident(a) => {
                assert_eq!(a.incident_location, "Gudang");
                assert_eq!(a.incident_description, "Tersandung");
            }
            other => panic!("unexpected details {:?}", other),
        }
        match normalizer.normalize(&raw, VisitType::Consultation).details {
            VisitDetails::Consultation(c) => {
                assert_eq!(c.complaint, "Lelah");
                assert_eq!(c.advice, "Istirahat cukup");
            }
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_normalize_untyped() {
        let normalizer = Normalizer::new();
        let raw = row(json!({ "Jenis Kunjungan": "Kecelakaan Kerja" }));
        let record = normalizer.normalize_untyped(&raw, VisitType::Treatment);
        assert_eq!(record.visit_type(), VisitType::WorkplaceAccident);

        let unknown = row(json!({ "Jenis Kunjungan": "???" }));
        let record = normalizer.normalize_untyped(&unknown, VisitType::Consultation);
        assert_eq!(record.visit_type(), VisitType::Consultation);
    }

    #[test]
    fn test_custom_key() {
        let mut normalizer = Normalizer::new();
        normalizer.add_key(Field::Company, "Company");
        let raw = row(json!({ "Company": "PT Lama" }));
        assert_eq!(normalizer.text(&raw, Field::Company), "PT Lama");
    }

    #[test]
    fn test_row_id_and_counts() {
        let normalizer = Normalizer::new();
        let raw = row(json!({ "row": 12, "lama_istirahat": "3 hari" }));
        let record = normalizer.normalize(&raw, VisitType::Treatment);
        assert_eq!(record.row_id, Some(12));
        assert_eq!(record.treatment().unwrap().rest_days, 3);

        assert_eq!(parse_count("2.0"), Some(2));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("abc"), None);
    }

    #[test]
    fn test_detect_schema() {
        let headers = row(json!({ "Nama": "a", "Jenis Kelamin": "b", "Perusahaan": "c" }));
        assert_eq!(detect_schema(&headers), Some(SourceSchema::SheetHeader));

        let snake = row(json!({ "nama": "a", "jenis_kelamin": "b", "kategori_diagnosa": "c" }));
        assert_eq!(detect_schema(&snake), Some(SourceSchema::SnakeCase));

        assert_eq!(detect_schema(&RawRow::new()), None);
    }
}
