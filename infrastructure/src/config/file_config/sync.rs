//! Sync configuration from TOML (`[sync]` section)

use serde::{Deserialize, Serialize};

/// Remote endpoint receiving queued local results
///
/// ```toml
/// [sync]
/// endpoint = "https://remote.example.org/api/cases"
/// ```
///
/// Without an endpoint, `sync` leaves every entry queued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSyncConfig {
    pub endpoint: Option<String>,
}
