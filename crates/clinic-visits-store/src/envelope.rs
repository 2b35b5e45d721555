//! Response envelope returned by the store.

use clinic_visits_core::RawRow;
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};
use crate::transport::HttpReply;

/// `{success, data, error?, message?}` as sent by every store action.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<RawRow>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Decode a reply, failing on non-2xx status or `success: false`.
    pub fn from_reply(reply: &HttpReply) -> StoreResult<Self> {
        if !reply.is_success() {
            return Err(StoreError::Remote(format!("HTTP {}", reply.status)));
        }
        let envelope: Envelope = serde_json::from_str(&reply.body)?;
        if !envelope.success {
            return Err(StoreError::Remote(envelope.failure_message()));
        }
        Ok(envelope)
    }

    fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown store error".to_string())
    }
}
