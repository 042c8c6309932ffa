//! Structured configuration issues.
//!
//! Validation never fails fast: it collects every issue so the caller can
//! print them all, then refuses to start if any has [`Severity::Error`].

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: no case may be processed with this configuration.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `max_debate_rounds` below zero.
    NegativeRoundBudget,
    /// `consensus_threshold` outside `[0, 1]`.
    ThresholdOutOfRange,
    /// Complexity bounds not ordered within `[0, 1]`.
    InvalidComplexityBounds,
    /// A confidence weight is negative or not finite.
    InvalidWeight,
    /// Worker pool of size zero.
    ZeroConcurrency,
    /// Per-call timeout of zero seconds.
    ZeroTimeout,
    /// Debate enabled with a round budget of zero: opinions are merged as-is.
    DebateWithoutRounds,
    /// Threshold is ignored by the `full_debate` policy.
    ThresholdIgnored,
    /// Unknown specialty name (default specialty, weight or model key).
    UnknownSpecialty,
    /// Unknown `consensus_policy` value.
    UnknownConsensusPolicy,
    /// A model name that is empty after trimming.
    EmptyModelName,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::NegativeRoundBudget,
            "diagnosis.max_debate_rounds must be >= 0 (got -1)",
        );
        assert!(issue.is_error());
        assert_eq!(
            issue.to_string(),
            "error: diagnosis.max_debate_rounds must be >= 0 (got -1)"
        );
    }
}
