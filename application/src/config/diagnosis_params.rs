//! Diagnosis parameters - debate and consensus control.

use consilium_domain::{
    ConfidenceWeights, ConfigIssue, ConfigIssueCode, ConsensusPolicyKind, DebatePolicy, Specialty,
};
use serde::{Deserialize, Serialize};

/// Controls the consultation and debate flow of
/// [`DiagnosisOrchestrator`](crate::use_cases::run_diagnosis::DiagnosisOrchestrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisParams {
    pub enable_debate: bool,
    pub max_debate_rounds: usize,
    /// Agreement needed to stop debating, in `[0, 1]`.
    pub consensus_threshold: f64,
    pub consensus_policy: ConsensusPolicyKind,
    /// Selected when no specialty triggers.
    pub default_specialty: Specialty,
    pub weights: ConfidenceWeights,
}

impl Default for DiagnosisParams {
    fn default() -> Self {
        Self {
            enable_debate: true,
            max_debate_rounds: 3,
            consensus_threshold: 0.85,
            consensus_policy: ConsensusPolicyKind::default(),
            default_specialty: Specialty::Cardiology,
            weights: ConfidenceWeights::uniform(),
        }
    }
}

impl DiagnosisParams {
    // ==================== Builder Methods ====================

    pub fn with_debate(mut self, enabled: bool) -> Self {
        self.enable_debate = enabled;
        self
    }

    pub fn with_max_debate_rounds(mut self, rounds: usize) -> Self {
        self.max_debate_rounds = rounds;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_consensus_policy(mut self, policy: ConsensusPolicyKind) -> Self {
        self.consensus_policy = policy;
        self
    }

    pub fn with_default_specialty(mut self, specialty: Specialty) -> Self {
        self.default_specialty = specialty;
        self
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Predicates the debate coordinator runs with.
    pub fn debate_policy(&self) -> DebatePolicy {
        DebatePolicy::from_kind(self.consensus_policy, self.consensus_threshold)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let t = self.consensus_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOutOfRange,
                format!("diagnosis.consensus_threshold must be within [0, 1] (got {})", t),
            ));
        }

        if self.enable_debate && self.max_debate_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DebateWithoutRounds,
                "debate is enabled but diagnosis.max_debate_rounds is 0; opinions are merged without revision",
            ));
        }

        if self.consensus_policy == ConsensusPolicyKind::FullDebate
            && (self.consensus_threshold - 0.85).abs() > f64::EPSILON
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ThresholdIgnored,
                "diagnosis.consensus_threshold has no effect with the full_debate policy",
            ));
        }

        for specialty in Specialty::ALL {
            let w = self.weights.weight(specialty);
            if !w.is_finite() || w < 0.0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidWeight,
                    format!("weight for {} must be a non-negative number (got {})", specialty, w),
                ));
            }
        }

        issues
    }
}
