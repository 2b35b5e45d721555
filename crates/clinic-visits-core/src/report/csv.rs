//! CSV export of the filtered record table.

use crate::models::VisitRecord;

const CSV_HEADER: &str = "row_id,tanggal,perusahaan,departemen,nama,jenis_kelamin,jenis_kunjungan,keterangan\n";

/// Export records to CSV, one line per record.
pub fn records_to_csv(records: &[VisitRecord]) -> String {
    let mut csv = String::from(CSV_HEADER);

    for record in records {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            record.row_id.map(|r| r.to_string()).unwrap_or_default(),
            escape_csv(&record.date),
            escape_csv(&record.company),
            escape_csv(&record.department),
            escape_csv(&record.person_name),
            escape_csv(record.gender.label()),
            escape_csv(record.visit_type().sheet_name()),
            escape_csv(record.summary()),
        ));
    }

    csv
}

/// Escape a CSV field.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
