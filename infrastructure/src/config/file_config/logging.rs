//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// ```toml
/// [logging]
/// transcript = "./logs/consilium.jsonl"   # JSONL conversation transcript
/// log_file = "./logs/consilium.log"       # tracing output
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub transcript: Option<String>,
    pub log_file: Option<String>,
}
