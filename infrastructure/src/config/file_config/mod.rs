//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Names stay strings here; conversion into domain and application types
//! collects every problem as a [`ConfigIssue`] instead of failing on the first.

mod diagnosis;
mod execution;
mod local;
mod logging;
mod models;
mod output;
mod provider;
mod routing;
mod sync;

pub use diagnosis::FileDiagnosisConfig;
pub use execution::FileExecutionConfig;
pub use local::FileLocalConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use routing::FileRoutingConfig;
pub use sync::FileSyncConfig;

use consilium_application::{EngineConfig, RoutingParams};
use consilium_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration rejected because at least one issue is an error.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", render_issues(.issues))]
pub struct ConfigValidationError {
    /// Every error-severity issue found
    pub issues: Vec<ConfigIssue>,
}

fn render_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Debate and consensus settings
    pub diagnosis: FileDiagnosisConfig,
    /// Complexity band boundaries
    pub routing: FileRoutingConfig,
    /// Local tier and offline queue
    pub local: FileLocalConfig,
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Worker pool and timeouts
    pub execution: FileExecutionConfig,
    /// Model endpoint
    pub provider: FileProviderConfig,
    /// Upload endpoint for queued results
    pub sync: FileSyncConfig,
    /// Transcript and log file locations
    pub logging: FileLoggingConfig,
    /// Report rendering
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Convert into an [`EngineConfig`] plus every issue found on the way.
    ///
    /// The returned config is usable only when no issue is an error.
    pub fn to_engine_config(&self) -> (EngineConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (diagnosis, mut found) = self.diagnosis.to_params();
        issues.append(&mut found);
        let (bounds, mut found) = self.routing.to_bounds();
        issues.append(&mut found);
        let (models, mut found) = self.models.to_model_config();
        issues.append(&mut found);

        let config = EngineConfig::default()
            .with_diagnosis(diagnosis)
            .with_routing(
                RoutingParams::default()
                    .with_bounds(bounds)
                    .with_offline_mode(self.local.offline_mode),
            )
            .with_execution(self.execution.to_params())
            .with_models(models);

        issues.extend(config.validate());
        (config, issues)
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_engine_config().1
    }

    /// Build the engine config, or fail with every error found.
    ///
    /// Warnings are returned alongside the config for display.
    pub fn into_engine_config(&self) -> Result<(EngineConfig, Vec<ConfigIssue>), ConfigValidationError> {
        let (config, issues) = self.to_engine_config();
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok((config, warnings))
        } else {
            Err(ConfigValidationError { issues: errors })
        }
    }
}
