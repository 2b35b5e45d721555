//! Store client against a scripted transport: multi-sheet join and the
//! fetch → dashboard pipeline.

use std::time::Duration;

use clinic_visits_core::models::{FilterCriteria, VisitType};
use clinic_visits_core::Dashboard;
use clinic_visits_store::{Method, MockResponse, MockTransport, StoreClient, StoreError};

const URL: &str = "https://script.example.com/exec";

fn sheet(rows: &str) -> MockResponse {
    MockResponse::ok(format!(r#"{{"success": true, "data": {}}}"#, rows))
}

fn three_sheets() -> Vec<MockResponse> {
    vec![
        sheet(
            r#"[
            {"Tanggal": "2024-03-15", "Perusahaan": "PT Maju", "Departemen": "Produksi",
             "Nama": "Budi", "Jenis Kelamin": "Laki-laki", "Kategori Diagnosa": "ISPA",
             "Nama Obat": "Paracetamol, Amoxicillin", "Perlu Istirahat": "Ya", "Lama Istirahat": "2"},
            {"Tanggal": "2024-01-10", "Perusahaan": "PT Jaya", "Departemen": "HR",
             "Nama": "Siti", "Jenis Kelamin": "Perempuan", "Nama Obat": "Paracetamol"}
        ]"#,
        ),
        sheet(
            r#"[
            {"tanggal": "2024-03-20", "perusahaan": "PT Maju", "departemen": "Gudang",
             "nama": "Agus", "jenis_kelamin": "Laki-laki", "lokasi_kejadian": "Gudang"}
        ]"#,
        ),
        sheet(r#"[{"Nama": "Dewi", "Perusahaan": "PT Maju"}]"#),
    ]
}

#[tokio::test]
async fn test_fetch_all_merges_three_sheets() {
    let client = StoreClient::with_transport(URL, MockTransport::with_responses(three_sheets()));
    let records = client.fetch_all().await.unwrap();

    assert_eq!(records.len(), 4);
    let types: Vec<_> = records.iter().map(|r| r.visit_type()).collect();
    assert_eq!(
        types.iter().filter(|t| **t == VisitType::Treatment).count(),
        2
    );
    assert!(types.contains(&VisitType::WorkplaceAccident));
    assert!(types.contains(&VisitType::Consultation));

    let calls = client.transport().calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.method == Method::Get));
    let mut sheets: Vec<_> = calls.iter().filter_map(|c| c.param("sheet")).collect();
    sheets.sort();
    assert_eq!(sheets, vec!["Berobat", "Kecelakaan Kerja", "Konsultasi"]);
}

#[tokio::test]
async fn test_fetch_all_is_all_or_nothing() {
    let mut responses = three_sheets();
    responses[1] = MockResponse::ok(r#"{"success": false, "error": "Sheet not found"}"#);
    let client = StoreClient::with_transport(URL, MockTransport::with_responses(responses));

    let err = client.fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_all_fails_when_one_sheet_hangs() {
    let mut responses = three_sheets();
    responses[2] = MockResponse::ok(r#"{"success": true}"#).after(Duration::from_secs(120));
    let client = StoreClient::with_transport(URL, MockTransport::with_responses(responses));

    let err = client.fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout(_)));
}

#[tokio::test]
async fn test_fetched_records_feed_dashboard() {
    let client = StoreClient::with_transport(URL, MockTransport::with_responses(three_sheets()));
    let records = client.fetch_all().await.unwrap();

    let mut dashboard = Dashboard::new(10);
    dashboard.set_records(records);
    dashboard.apply(
        FilterCriteria::default()
            .with_company("PT Maju")
            .with_year(2024)
            .with_month(3),
    );

    let names: Vec<_> = dashboard
        .filtered()
        .iter()
        .map(|r| r.person_name.as_str())
        .collect();
    assert_eq!(names, vec!["Agus", "Budi"]);

    let report = dashboard.report("Maret 2024");
    assert_eq!(report.total_visits, 2);
    assert_eq!(report.total_rest_days, 2);
    let medicines: Vec<_> = report
        .medicines
        .rows
        .iter()
        .map(|r| (r.label.as_str(), r.count, r.percentage.as_str()))
        .collect();
    assert_eq!(
        medicines,
        vec![("Paracetamol", 1, "50.0"), ("Amoxicillin", 1, "50.0")]
    );
}
