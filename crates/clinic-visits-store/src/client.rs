//! Remote store client.
//!
//! Saves are optimistic: once the POST is dispatched without a wire-level
//! error the save is reported as accepted, and the response body is not
//! inspected. Duplicate submissions are detectable server-side through the
//! payload's idempotency key.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use clinic_visits_core::models::{RemoteConfig, VisitRecord, VisitType};
use clinic_visits_core::{Normalizer, RawRow, SavePayload, VisitForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};
use crate::transport::{HttpReply, ReqwestTransport, Transport};

/// Query key for the GET-fallback uniqueness token.
pub const UNIQUE_ID: &str = "unique_id";

pub const SAVE_SUCCESS_MESSAGE: &str = "Data berhasil disimpan";
pub const DELETE_SUCCESS_MESSAGE: &str = "Data berhasil dihapus";
pub const CONNECTION_OK_MESSAGE: &str = "Koneksi berhasil";

/// Per-request deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    /// Connection checks
    pub quick: Duration,
    /// Sheet fetches
    pub fetch: Duration,
    /// Saves and deletes, per attempt
    pub save: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            quick: Duration::from_secs(5),
            fetch: Duration::from_secs(30),
            save: Duration::from_secs(15),
        }
    }
}

/// Outcome of a save, delete or connection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReply {
    pub success: bool,
    pub message: String,
}

impl StoreReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Client for one store endpoint.
pub struct StoreClient<T = ReqwestTransport> {
    endpoint: String,
    transport: T,
    timeouts: StoreTimeouts,
    normalizer: Normalizer,
}

impl StoreClient<ReqwestTransport> {
    /// Client for `endpoint` over a real HTTP transport.
    pub fn connect(endpoint: &str) -> StoreResult<Self> {
        Ok(Self::with_transport(endpoint, ReqwestTransport::new()?))
    }
}

impl<T: Transport> StoreClient<T> {
    pub fn with_transport(endpoint: &str, transport: T) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
            transport,
            timeouts: StoreTimeouts::default(),
            normalizer: Normalizer::new(),
        }
    }

    /// Client for the endpoint in a persisted remote config.
    ///
    /// Fails with [`StoreError::NotConfigured`] when the config is disabled
    /// or has no URL.
    pub fn from_config(config: &RemoteConfig, transport: T) -> StoreResult<Self> {
        let endpoint = config.endpoint().ok_or(StoreError::NotConfigured)?;
        Ok(Self::with_transport(endpoint, transport))
    }

    pub fn with_timeouts(mut self, timeouts: StoreTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate a form and send the resulting record.
    ///
    /// Only validation fails with an error; the store outcome is in the reply.
    pub async fn submit(&self, form: &VisitForm) -> StoreResult<StoreReply> {
        let record = form.validate()?;
        Ok(self.send(&record).await)
    }

    /// Save a record.
    ///
    /// POSTs the form-encoded payload. If the POST fails at the wire level
    /// (network error or timeout) the same payload is sent once more as GET
    /// query parameters with a fresh `unique_id`. Never returns an error; a
    /// failed fallback is reported in the reply.
    pub async fn send(&self, record: &VisitRecord) -> StoreReply {
        let payload = SavePayload::from_record(record);
        let sheet = record.visit_type().sheet_name();
        tracing::info!(
            sheet,
            idempotency_key = %payload.idempotency_key,
            "sending record"
        );

        let primary = timed(
            self.timeouts.save,
            self.transport.post_form(&self.endpoint, &payload.fields),
        )
        .await;

        let outcome = match primary {
            Err(err) if err.is_transport() => {
                tracing::warn!(error = %err, "save POST failed, retrying via GET");
                let mut query = payload.fields.clone();
                query.push((UNIQUE_ID.to_string(), unique_id()));
                timed(self.timeouts.save, self.transport.get(&self.endpoint, &query)).await
            }
            other => other,
        };

        match outcome {
            Ok(reply) => {
                tracing::debug!(status = reply.status, "save dispatched");
                StoreReply::ok(SAVE_SUCCESS_MESSAGE)
            }
            Err(err) => {
                tracing::error!(sheet, error = %err, "save failed");
                StoreReply::failed(err.to_string())
            }
        }
    }

    /// Fetch every raw row of one sheet.
    pub async fn fetch(&self, visit_type: VisitType) -> StoreResult<Vec<RawRow>> {
        let sheet = visit_type.sheet_name();
        let query = vec![
            ("action".to_string(), "getdata".to_string()),
            ("sheet".to_string(), sheet.to_string()),
            ("timestamp".to_string(), epoch_millis()),
        ];

        let reply = timed(self.timeouts.fetch, self.transport.get(&self.endpoint, &query)).await?;
        let envelope = Envelope::from_reply(&reply).map_err(|err| {
            tracing::warn!(sheet, error = %err, "fetch rejected");
            err
        })?;

        tracing::debug!(sheet, rows = envelope.data.len(), "sheet fetched");
        Ok(envelope.data)
    }

    /// Fetch and normalize one sheet.
    pub async fn fetch_records(&self, visit_type: VisitType) -> StoreResult<Vec<VisitRecord>> {
        let rows = self.fetch(visit_type).await?;
        Ok(self.normalizer.normalize_sheet(&rows, visit_type))
    }

    /// Fetch all three sheets concurrently and merge them.
    ///
    /// All-or-nothing: if any sheet fails, no records are returned.
    pub async fn fetch_all(&self) -> StoreResult<Vec<VisitRecord>> {
        let (treatment, accident, consultation) = tokio::try_join!(
            self.fetch_records(VisitType::Treatment),
            self.fetch_records(VisitType::WorkplaceAccident),
            self.fetch_records(VisitType::Consultation),
        )
        .map_err(|err| {
            tracing::error!(error = %err, "multi-sheet fetch failed");
            err
        })?;

        tracing::info!(
            treatment = treatment.len(),
            accident = accident.len(),
            consultation = consultation.len(),
            "all sheets fetched"
        );

        let mut records = treatment;
        records.extend(accident);
        records.extend(consultation);
        Ok(records)
    }

    /// Delete one row of a sheet.
    ///
    /// Tries GET first and falls back once to a form POST on any failure.
    /// Never returns an error; the outcome is in the reply.
    pub async fn delete(&self, visit_type: VisitType, row_id: u32) -> StoreReply {
        let sheet = visit_type.sheet_name();
        let params = vec![
            ("action".to_string(), "delete".to_string()),
            ("sheet".to_string(), sheet.to_string()),
            ("row".to_string(), row_id.to_string()),
            ("timestamp".to_string(), epoch_millis()),
        ];
        tracing::info!(sheet, row_id, "deleting row");

        let primary = timed(self.timeouts.save, self.transport.get(&self.endpoint, &params))
            .await
            .and_then(|reply| Envelope::from_reply(&reply));

        match primary {
            Ok(envelope) => deleted(envelope),
            Err(err) => {
                tracing::warn!(error = %err, "delete GET failed, retrying via POST");
                let fallback = timed(
                    self.timeouts.save,
                    self.transport.post_form(&self.endpoint, &params),
                )
                .await
                .and_then(|reply| fallback_envelope(&reply));

                match fallback {
                    Ok(envelope) => deleted(envelope),
                    Err(err) => {
                        tracing::error!(sheet, row_id, error = %err, "delete failed");
                        StoreReply::failed(err.to_string())
                    }
                }
            }
        }
    }

    /// Check that the endpoint answers a data request within the quick deadline.
    pub async fn check_connection(&self) -> StoreReply {
        let query = vec![
            ("action".to_string(), "getdata".to_string()),
            ("sheet".to_string(), VisitType::ALL[0].sheet_name().to_string()),
            ("timestamp".to_string(), epoch_millis()),
        ];

        let result = timed(self.timeouts.quick, self.transport.get(&self.endpoint, &query))
            .await
            .and_then(|reply| Envelope::from_reply(&reply));

        match result {
            Ok(_) => StoreReply::ok(CONNECTION_OK_MESSAGE),
            Err(err) => {
                tracing::warn!(endpoint = %self.endpoint, error = %err, "connection check failed");
                StoreReply::failed(err.to_string())
            }
        }
    }
}

/// Await `request`, aborting it once `deadline` passes.
async fn timed<F>(deadline: Duration, request: F) -> StoreResult<HttpReply>
where
    F: Future<Output = StoreResult<HttpReply>>,
{
    match tokio::time::timeout(deadline, request).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(deadline_secs = deadline.as_secs(), "request timed out");
            Err(StoreError::Timeout(deadline))
        }
    }
}

/// The POST fallback may not return a readable envelope; a 2xx without one
/// counts as accepted.
fn fallback_envelope(reply: &HttpReply) -> StoreResult<Envelope> {
    match Envelope::from_reply(reply) {
        Err(StoreError::Decode(_)) => Ok(Envelope {
            success: true,
            data: Vec::new(),
            error: None,
            message: None,
        }),
        other => other,
    }
}

fn deleted(envelope: Envelope) -> StoreReply {
    StoreReply::ok(
        envelope
            .message
            .unwrap_or_else(|| DELETE_SUCCESS_MESSAGE.to_string()),
    )
}

fn epoch_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// `<epoch-ms>-<uuid v4>`
fn unique_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Method, MockResponse, MockTransport};

    const URL: &str = "https://script.example.com/exec";

    fn client(responses: Vec<MockResponse>) -> StoreClient<MockTransport> {
        StoreClient::with_transport(URL, MockTransport::with_responses(responses))
    }

    fn sample_record() -> VisitRecord {
        VisitRecord::new(
            VisitType::Consultation,
            "PT Maju",
            "Produksi",
            "Budi",
            "2024-03-15",
        )
    }

    #[test]
    fn test_default_timeouts() {
        let t = StoreTimeouts::default();
        assert_eq!(t.quick, Duration::from_secs(5));
        assert_eq!(t.fetch, Duration::from_secs(30));
        assert_eq!(t.save, Duration::from_secs(15));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let disabled = RemoteConfig::default();
        assert!(matches!(
            StoreClient::from_config(&disabled, MockTransport::new()),
            Err(StoreError::NotConfigured)
        ));

        let config = RemoteConfig::new(URL);
        let client = StoreClient::from_config(&config, MockTransport::new()).unwrap();
        assert_eq!(client.endpoint(), URL);
    }

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id();
        let (millis, uuid) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(Uuid::parse_str(uuid).is_ok());
    }

    #[tokio::test]
    async fn test_send_posts_form_once() {
        let client = client(vec![MockResponse::status(302, "")]);
        let reply = client.send(&sample_record()).await;
        assert!(reply.success);

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].url, URL);
        assert_eq!(calls[0].param("action"), Some("save"));
        assert_eq!(calls[0].param("type"), Some("Konsultasi"));
        assert_eq!(calls[0].param("nama"), Some("Budi"));
        assert!(calls[0].param("idempotency_key").is_some());
        assert!(calls[0].param(UNIQUE_ID).is_none());
    }

    #[tokio::test]
    async fn test_send_falls_back_to_get() {
        let client = client(vec![
            MockResponse::network_error("connection reset"),
            MockResponse::ok(r#"{"success": true}"#),
        ]);
        let reply = client.send(&sample_record()).await;
        assert!(reply.success);

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, Method::Get);
        assert_eq!(calls[1].param("action"), Some("save"));
        assert_eq!(
            calls[1].param("idempotency_key"),
            calls[0].param("idempotency_key")
        );
        assert!(calls[1].param(UNIQUE_ID).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_timeout_falls_back_to_get_once() {
        let client = client(vec![
            MockResponse::status(200, "").after(Duration::from_secs(60)),
            MockResponse::ok(r#"{"success": true}"#),
        ]);
        let reply = client.send(&sample_record()).await;
        assert!(reply.success);

        let methods: Vec<_> = client.transport().calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec![Method::Post, Method::Get]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_timeout_falls_back_to_post_once() {
        let client = client(vec![
            MockResponse::ok(r#"{"success": true}"#).after(Duration::from_secs(60)),
            MockResponse::ok(r#"{"success": true, "message": "Baris 7 dihapus"}"#),
        ]);
        let reply = client.delete(VisitType::Treatment, 7).await;
        assert_eq!(reply, StoreReply::ok("Baris 7 dihapus"));

        let methods: Vec<_> = client.transport().calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec![Method::Get, Method::Post]);
    }

    #[tokio::test]
    async fn test_send_fails_after_single_fallback() {
        let client = client(vec![
            MockResponse::network_error("down"),
            MockResponse::network_error("still down"),
        ]);
        let reply = client.send(&sample_record()).await;
        assert!(!reply.success);
        assert!(reply.message.contains("still down"));
        assert_eq!(client.transport().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_form() {
        let client = client(vec![]);
        let form = VisitForm::new(VisitType::Treatment);
        let err = client.submit(&form).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_query() {
        let client = client(vec![MockResponse::ok(
            r#"{"success": true, "data": [{"Nama": "Budi"}]}"#,
        )]);
        let rows = client.fetch(VisitType::WorkplaceAccident).await.unwrap();
        assert_eq!(rows.len(), 1);

        let calls = client.transport().calls();
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].param("action"), Some("getdata"));
        assert_eq!(calls[0].param("sheet"), Some("Kecelakaan Kerja"));
        assert!(calls[0]
            .param("timestamp")
            .is_some_and(|t| t.parse::<i64>().is_ok()));
    }

    #[tokio::test]
    async fn test_fetch_remote_failure_is_not_retried() {
        let client = client(vec![MockResponse::ok(
            r#"{"success": false, "error": "Sheet not found"}"#,
        )]);
        let err = client.fetch(VisitType::Treatment).await.unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
        assert_eq!(client.transport().calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_times_out() {
        let client = client(vec![
            MockResponse::ok(r#"{"success": true}"#).after(Duration::from_secs(60))
        ]);
        let err = client.fetch(VisitType::Treatment).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_delete_get_success() {
        let client = client(vec![MockResponse::ok(
            r#"{"success": true, "message": "Baris 5 dihapus"}"#,
        )]);
        let reply = client.delete(VisitType::Treatment, 5).await;
        assert_eq!(reply, StoreReply::ok("Baris 5 dihapus"));

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].param("action"), Some("delete"));
        assert_eq!(calls[0].param("sheet"), Some("Berobat"));
        assert_eq!(calls[0].param("row"), Some("5"));
    }

    #[tokio::test]
    async fn test_delete_falls_back_to_post() {
        let client = client(vec![
            MockResponse::network_error("blocked"),
            MockResponse::status(200, ""),
        ]);
        let reply = client.delete(VisitType::Consultation, 3).await;
        assert!(reply.success);
        assert_eq!(reply.message, DELETE_SUCCESS_MESSAGE);

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, Method::Post);
        assert_eq!(calls[1].param("row"), Some("3"));
    }

    #[tokio::test]
    async fn test_delete_reports_failure_without_error() {
        let client = client(vec![
            MockResponse::ok(r#"{"success": false, "error": "Row not found"}"#),
            MockResponse::ok(r#"{"success": false, "error": "Row not found"}"#),
        ]);
        let reply = client.delete(VisitType::Treatment, 99).await;
        assert!(!reply.success);
        assert!(reply.message.contains("Row not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_connection_uses_quick_deadline() {
        let client = client(vec![
            MockResponse::ok(r#"{"success": true}"#).after(Duration::from_secs(6))
        ]);
        let reply = client.check_connection().await;
        assert!(!reply.success);
        assert!(reply.message.contains("5s"));
    }

    #[tokio::test]
    async fn test_check_connection_ok() {
        let client = client(vec![MockResponse::ok(r#"{"success": true, "data": []}"#)]);
        assert_eq!(client.check_connection().await, StoreReply::ok(CONNECTION_OK_MESSAGE));
    }
}
