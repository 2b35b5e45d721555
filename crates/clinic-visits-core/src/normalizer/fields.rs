//! Source column spellings for each canonical field.
//!
//! The store has been written by several generations of forms, so one field
//! may arrive under a spreadsheet header ("Jenis Kelamin"), a snake_case form
//! key ("jenis_kelamin") or a camelCase key ("jenisKelamin"). Lookup order is
//! fixed: header, then snake_case, then camelCase.

use serde::{Deserialize, Serialize};

/// One known source schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSchema {
    /// Human-readable spreadsheet headers
    SheetHeader,
    /// snake_case keys posted by the form
    SnakeCase,
    /// camelCase keys from older clients
    CamelCase,
}

impl SourceSchema {
    /// Lookup precedence, first match wins.
    pub const PRECEDENCE: [SourceSchema; 3] = [
        SourceSchema::SheetHeader,
        SourceSchema::SnakeCase,
        SourceSchema::CamelCase,
    ];

    fn index(self) -> usize {
        match self {
            SourceSchema::SheetHeader => 0,
            SourceSchema::SnakeCase => 1,
            SourceSchema::CamelCase => 2,
        }
    }
}

/// Canonical record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RowId,
    Company,
    Date,
    Timestamp,
    PersonName,
    Department,
    Gender,
    VisitType,
    Complaint,
    Action,
    DiagnosisCategory,
    DiagnosisName,
    DiagnosisNote,
    MedicineCategory,
    MedicineName,
    MedicineQuantity,
    MedicineUnit,
    DosageInstructions,
    RestRequired,
    RestDays,
    RestNote,
    IncidentLocation,
    IncidentDescription,
    Advice,
}

impl Field {
    pub const ALL: [Field; 24] = [
        Field::RowId,
        Field::Company,
        Field::Date,
        Field::Timestamp,
        Field::PersonName,
        Field::Department,
        Field::Gender,
        Field::VisitType,
        Field::Complaint,
        Field::Action,
        Field::DiagnosisCategory,
        Field::DiagnosisName,
        Field::DiagnosisNote,
        Field::MedicineCategory,
        Field::MedicineName,
        Field::MedicineQuantity,
        Field::MedicineUnit,
        Field::DosageInstructions,
        Field::RestRequired,
        Field::RestDays,
        Field::RestNote,
        Field::IncidentLocation,
        Field::IncidentDescription,
        Field::Advice,
    ];

    /// Source keys in lookup order: header, snake_case, camelCase.
    pub fn keys(self) -> [&'static str; 3] {
        match self {
            Field::RowId => ["Row", "row", "rowIndex"],
            Field::Company => ["Perusahaan", "perusahaan", "perusahaan"],
            Field::Date => ["Tanggal", "tanggal", "tanggal"],
            Field::Timestamp => ["Timestamp", "timestamp", "timestamp"],
            Field::PersonName => ["Nama", "nama", "nama"],
            Field::Department => ["Departemen", "departemen", "departemen"],
            Field::Gender => ["Jenis Kelamin", "jenis_kelamin", "jenisKelamin"],
            Field::VisitType => ["Jenis Kunjungan", "jenis_kunjungan", "jenisKunjungan"],
            Field::Complaint => ["Keluhan", "keluhan", "keluhan"],
            Field::Action => ["Tindakan", "tindakan", "tindakan"],
            Field::DiagnosisCategory => {
                ["Kategori Diagnosa", "kategori_diagnosa", "kategoriDiagnosa"]
            }
            Field::DiagnosisName => ["Nama Diagnosa", "nama_diagnosa", "namaDiagnosa"],
            Field::DiagnosisNote => ["Catatan Diagnosa", "catatan_diagnosa", "catatanDiagnosa"],
            Field::MedicineCategory => ["Kategori Obat", "kategori_obat", "kategoriObat"],
            Field::MedicineName => ["Nama Obat", "nama_obat", "namaObat"],
            Field::MedicineQuantity => ["Jumlah Obat", "jumlah_obat", "jumlahObat"],
            Field::MedicineUnit => ["Satuan Obat", "satuan_obat", "satuanObat"],
            Field::DosageInstructions => ["Aturan Pakai", "aturan_pakai", "aturanPakai"],
            Field::RestRequired => ["Perlu Istirahat", "perlu_istirahat", "perluIstirahat"],
            Field::RestDays => ["Lama Istirahat", "lama_istirahat", "lamaIstirahat"],
            Field::RestNote => ["Catatan Istirahat", "catatan_istirahat", "catatanIstirahat"],
            Field::IncidentLocation => ["Lokasi Kejadian", "lokasi_kejadian", "lokasiKejadian"],
            Field::IncidentDescription => [
                "Deskripsi Kejadian",
                "deskripsi_kejadian",
                "deskripsiKejadian",
            ],
            Field::Advice => ["Saran", "saran", "saran"],
        }
    }

    /// Key for this field in one source schema.
    pub fn key(self, schema: SourceSchema) -> &'static str {
        self.keys()[schema.index()]
    }

    /// Canonical field name, used in validation messages.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Field::RowId => "rowId",
            Field::Company => "company",
            Field::Date => "date",
            Field::Timestamp => "timestamp",
            Field::PersonName => "personName",
            Field::Department => "department",
            Field::Gender => "gender",
            Field::VisitType => "visitType",
            Field::Complaint => "complaint",
            Field::Action => "action",
            Field::DiagnosisCategory => "diagnosisCategory",
            Field::DiagnosisName => "diagnosisName",
            Field::DiagnosisNote => "diagnosisNote",
            Field::MedicineCategory => "medicineCategory",
            Field::MedicineName => "medicineName",
            Field::MedicineQuantity => "medicineQuantity",
            Field::MedicineUnit => "medicineUnit",
            Field::DosageInstructions => "dosageInstructions",
            Field::RestRequired => "restRequired",
            Field::RestDays => "restDays",
            Field::RestNote => "restNote",
            Field::IncidentLocation => "incidentLocation",
            Field::IncidentDescription => "incidentDescription",
            Field::Advice => "advice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table_precedence() {
        assert_eq!(Field::Company.keys()[..2], ["Perusahaan", "perusahaan"]);
        assert_eq!(Field::Date.keys()[..2], ["Tanggal", "tanggal"]);
        assert_eq!(Field::PersonName.keys()[..2], ["Nama", "nama"]);
        assert_eq!(Field::Department.keys()[..2], ["Departemen", "departemen"]);
        assert_eq!(Field::Gender.keys()[..2], ["Jenis Kelamin", "jenis_kelamin"]);
        assert_eq!(Field::VisitType.keys()[..2], ["Jenis Kunjungan", "jenis_kunjungan"]);
        assert_eq!(
            Field::DiagnosisCategory.keys()[..2],
            ["Kategori Diagnosa", "kategori_diagnosa"]
        );
        assert_eq!(Field::MedicineName.keys()[..2], ["Nama Obat", "nama_obat"]);
        assert_eq!(Field::RestRequired.keys()[..2], ["Perlu Istirahat", "perlu_istirahat"]);
    }

    #[test]
    fn test_key_by_schema() {
        assert_eq!(Field::Gender.key(SourceSchema::SheetHeader), "Jenis Kelamin");
        assert_eq!(Field::Gender.key(SourceSchema::SnakeCase), "jenis_kelamin");
        assert_eq!(Field::Gender.key(SourceSchema::CamelCase), "jenisKelamin");
    }
}
