//! Engine configuration container.

use super::{DiagnosisParams, ExecutionParams, RoutingParams};
use consilium_domain::{ConfigIssue, ConfigIssueCode, DomainError, ModelConfig};
use thiserror::Error;

/// Configuration errors; fatal before any case is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything the use cases need to run.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub diagnosis: DiagnosisParams,
    pub routing: RoutingParams,
    pub execution: ExecutionParams,
    pub models: ModelConfig,
}

impl EngineConfig {
    pub fn with_diagnosis(mut self, diagnosis: DiagnosisParams) -> Self {
        self.diagnosis = diagnosis;
        self
    }

    pub fn with_routing(mut self, routing: RoutingParams) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Every issue found, errors and warnings alike.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.diagnosis.validate();

        if self.execution.max_concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "execution.max_concurrency must be at least 1",
            ));
        }
        if self.execution.call_timeout.is_zero() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "execution.call_timeout_secs must be at least 1",
            ));
        }

        issues
    }

    /// Fail on the first batch of errors; warnings are returned for display.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
