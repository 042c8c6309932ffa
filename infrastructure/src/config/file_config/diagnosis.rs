//! Diagnosis configuration from TOML (`[diagnosis]` section)
//!
//! ```toml
//! [diagnosis]
//! enable_debate = true
//! max_debate_rounds = 3
//! consensus_threshold = 0.85
//! consensus_policy = "agreement"   # or "full_debate"
//! default_specialty = "cardiology"
//!
//! [diagnosis.weights]
//! radiology = 1.5
//! ```

use consilium_application::DiagnosisParams;
use consilium_domain::{
    ConfidenceWeights, ConfigIssue, ConfigIssueCode, ConsensusPolicyKind, Specialty,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiagnosisConfig {
    pub enable_debate: bool,
    /// Signed so that a negative budget is reported instead of failing to parse
    pub max_debate_rounds: i64,
    pub consensus_threshold: f64,
    pub consensus_policy: String,
    pub default_specialty: String,
    /// Per-specialty confidence weights, keyed by specialty name
    pub weights: BTreeMap<String, f64>,
}

impl Default for FileDiagnosisConfig {
    fn default() -> Self {
        let params = DiagnosisParams::default();
        Self {
            enable_debate: params.enable_debate,
            max_debate_rounds: params.max_debate_rounds as i64,
            consensus_threshold: params.consensus_threshold,
            consensus_policy: params.consensus_policy.as_str().to_string(),
            default_specialty: params.default_specialty.as_str().to_string(),
            weights: BTreeMap::new(),
        }
    }
}

impl FileDiagnosisConfig {
    /// Convert into [`DiagnosisParams`], collecting parse issues.
    ///
    /// Range checks that also apply to programmatic configuration live in
    /// [`DiagnosisParams::validate`]; this only reports what cannot even be
    /// represented (negative rounds, unknown names, rejected weights).
    pub fn to_params(&self) -> (DiagnosisParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = DiagnosisParams::default()
            .with_debate(self.enable_debate)
            .with_consensus_threshold(self.consensus_threshold);

        if self.max_debate_rounds < 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NegativeRoundBudget,
                format!(
                    "diagnosis.max_debate_rounds must be >= 0 (got {})",
                    self.max_debate_rounds
                ),
            ));
        } else {
            params = params.with_max_debate_rounds(self.max_debate_rounds as usize);
        }

        match self.consensus_policy.parse::<ConsensusPolicyKind>() {
            Ok(kind) => params = params.with_consensus_policy(kind),
            Err(e) => issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownConsensusPolicy,
                format!("diagnosis.consensus_policy: {}", e),
            )),
        }

        match self.default_specialty.parse::<Specialty>() {
            Ok(specialty) => params = params.with_default_specialty(specialty),
            Err(e) => issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownSpecialty,
                format!("diagnosis.default_specialty: {}", e),
            )),
        }

        let mut weights = ConfidenceWeights::uniform();
        for (name, &weight) in &self.weights {
            let specialty = match name.parse::<Specialty>() {
                Ok(s) => s,
                Err(e) => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownSpecialty,
                        format!("diagnosis.weights: {}", e),
                    ));
                    continue;
                }
            };
            match weights.clone().with_weight(specialty, weight) {
                Ok(updated) => weights = updated,
                Err(e) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidWeight,
                    format!("diagnosis.weights.{}: {}", name, e),
                )),
            }
        }
        params = params.with_weights(weights);

        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_defaults_convert_cleanly() {
        let (params, issues) = FileDiagnosisConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params, DiagnosisParams::default());
    }

    #[test]
    fn test_negative_rounds_is_an_error() {
        let config: FileConfig = toml::from_str("[diagnosis]\nmax_debate_rounds = -1\n").unwrap();
        let (_, issues) = config.diagnosis.to_params();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::NegativeRoundBudget);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_policy_and_weights() {
        let toml_str = r#"
[diagnosis]
consensus_policy = "full-debate"
default_specialty = "oncology"

[diagnosis.weights]
radiology = 1.5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (params, issues) = config.diagnosis.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.consensus_policy, ConsensusPolicyKind::FullDebate);
        assert_eq!(params.default_specialty, Specialty::Oncology);
        assert_eq!(params.weights.weight(Specialty::Radiology), 1.5);
        assert_eq!(params.weights.weight(Specialty::Cardiology), 1.0);
    }

    #[test]
    fn test_unknown_names_are_reported() {
        let toml_str = r#"
[diagnosis]
consensus_policy = "vote"
default_specialty = "dermatology"

[diagnosis.weights]
neurology = 2.0
cardiology = -1.0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (_, issues) = config.diagnosis.to_params();
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::UnknownConsensusPolicy));
        assert!(codes.contains(&ConfigIssueCode::UnknownSpecialty));
        assert!(codes.contains(&ConfigIssueCode::InvalidWeight));
        assert_eq!(issues.len(), 4);
    }
}
