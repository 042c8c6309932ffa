//! Upload of queued local results to the remote tier.

use async_trait::async_trait;
use consilium_application::{RemoteUploader, SyncStoreError};
use consilium_domain::SyncQueueEntry;
use reqwest::Client;
use tracing::{debug, warn};

/// Posts each entry as JSON to a fixed endpoint.
///
/// Any 2xx counts as accepted; other statuses decline the entry so it stays
/// queued. Transport failures are errors and also leave the entry queued.
pub struct HttpUploader {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl RemoteUploader for HttpUploader {
    async fn upload(&self, entry: &SyncQueueEntry) -> Result<bool, SyncStoreError> {
        debug!("Uploading {} to {}", entry.id, self.endpoint);
        let mut builder = self.client.post(&self.endpoint).json(entry);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SyncStoreError::Upload(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else {
            warn!("Remote declined {}: {}", entry.id, status);
            Ok(false)
        }
    }
}

/// Uploader used when no `[sync] endpoint` is configured: declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredUploader;

#[async_trait]
impl RemoteUploader for UnconfiguredUploader {
    async fn upload(&self, entry: &SyncQueueEntry) -> Result<bool, SyncStoreError> {
        warn!("No sync endpoint configured; keeping {} queued", entry.id);
        Ok(false)
    }
}
