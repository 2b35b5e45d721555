//! Persisted front-end settings.

use serde::{Deserialize, Serialize};

/// Remote store configuration, persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Whether records are sent to the remote store at all
    #[serde(default)]
    pub enabled: bool,
    /// Endpoint URL of the spreadsheet web-app
    #[serde(default)]
    pub url: String,
    /// Whether the dashboard refreshes from the store automatically
    #[serde(default)]
    pub sync_enabled: bool,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            sync_enabled: true,
        }
    }

    /// Endpoint to use, if the store is enabled and a URL is set.
    pub fn endpoint(&self) -> Option<&str> {
        let url = self.url.trim();
        (self.enabled && !url.is_empty()).then_some(url)
    }
}
