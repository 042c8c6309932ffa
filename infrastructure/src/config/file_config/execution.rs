//! Execution configuration from TOML (`[execution]` section)

use consilium_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Worker pool and timeout settings
///
/// ```toml
/// [execution]
/// max_concurrency = 4
/// call_timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_concurrency: usize,
    pub call_timeout_secs: u64,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_concurrency: params.max_concurrency,
            call_timeout_secs: params.call_timeout.as_secs(),
        }
    }
}

impl FileExecutionConfig {
    /// Zero values pass through; [`EngineConfig::validate`] rejects them.
    ///
    /// [`EngineConfig::validate`]: consilium_application::EngineConfig::validate
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_concurrency(self.max_concurrency)
            .with_call_timeout(Duration::from_secs(self.call_timeout_secs))
    }
}
