//! Consensus merging.

use super::agreement::agreement_score;
use super::state::DebateState;
use crate::core::error::DomainError;
use crate::opinion::OpinionSet;
use crate::specialty::Specialty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate confidence of an empty Opinion Set.
pub const EMPTY_SET_CONFIDENCE: f64 = 0.5;

/// Aggregate of an Opinion Set (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Every member's diagnosis candidates, in specialty order; duplicates kept
    pub diagnoses: Vec<String>,
    /// Every member's recommendations, in specialty order; duplicates kept
    pub recommendations: Vec<String>,
    /// Aggregate confidence in `[0, 1]`
    pub confidence: f64,
    /// Round at which the merged set was produced (0 = no revision)
    pub rounds: usize,
    /// Terminal debate state, `None` when no debate ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<DebateState>,
    /// Agreement score of the merged set
    pub agreement: f64,
}

impl ConsensusResult {
    pub fn converged(&self) -> bool {
        matches!(self.termination, Some(DebateState::Converged(_)))
    }
}

/// Per-specialty reliability weights for confidence aggregation.
///
/// Specialties without an explicit weight count as `1.0`. With no overrides
/// the aggregate is the plain arithmetic mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceWeights {
    weights: BTreeMap<Specialty, f64>,
}

impl ConfidenceWeights {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, specialty: Specialty, weight: f64) -> Result<Self, DomainError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::OutOfRange {
                field: "weight",
                value: weight,
            });
        }
        self.weights.insert(specialty, weight);
        Ok(self)
    }

    pub fn weight(&self, specialty: Specialty) -> f64 {
        self.weights.get(&specialty).copied().unwrap_or(1.0)
    }

    pub fn is_uniform(&self) -> bool {
        self.weights.values().all(|w| (*w - 1.0).abs() < f64::EPSILON)
    }
}

/// Folds an Opinion Set into a [`ConsensusResult`].
///
/// Pure and total: the input is never modified and every set, including the
/// empty one, produces a result.
#[derive(Debug, Clone, Default)]
pub struct ConsensusMerger {
    weights: ConfidenceWeights,
}

impl ConsensusMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ConfidenceWeights {
        &self.weights
    }

    /// Merge a set that did not go through debate.
    pub fn merge(&self, set: &OpinionSet) -> ConsensusResult {
        let diagnoses = set
            .iter()
            .flat_map(|o| o.diagnoses.iter().cloned())
            .collect();
        let recommendations = set
            .iter()
            .flat_map(|o| o.recommendations.iter().cloned())
            .collect();

        ConsensusResult {
            diagnoses,
            recommendations,
            confidence: self.aggregate_confidence(set),
            rounds: 0,
            termination: None,
            agreement: agreement_score(set),
        }
    }

    /// Merge the terminal set of a debate, recording where it stopped.
    pub fn merge_terminal(&self, set: &OpinionSet, state: DebateState) -> ConsensusResult {
        ConsensusResult {
            rounds: state.round(),
            termination: Some(state),
            ..self.merge(set)
        }
    }

    fn aggregate_confidence(&self, set: &OpinionSet) -> f64 {
        if set.is_empty() {
            return EMPTY_SET_CONFIDENCE;
        }

        let (weighted, weight_sum) = set.iter().fold((0.0, 0.0), |(acc, sum), o| {
            let w = self.weights.weight(o.specialty);
            (acc + w * o.confidence, sum + w)
        });

        let value = if weight_sum > 0.0 {
            weighted / weight_sum
        } else {
            set.iter().map(|o| o.confidence).sum::<f64>() / set.len() as f64
        };
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opinion::Opinion;

    fn opinion(specialty: Specialty, diagnoses: &[&str], confidence: f64) -> Opinion {
        Opinion::new(specialty, "summary")
            .with_diagnoses(diagnoses.iter().map(|s| s.to_string()).collect())
            .with_recommendations(vec![format!("{} follow-up", specialty.as_str())])
            .with_confidence(confidence)
    }

    #[test]
    fn test_empty_set_confidence() {
        let result = ConsensusMerger::new().merge(&OpinionSet::new());
        assert_eq!(result.confidence, EMPTY_SET_CONFIDENCE);
        assert!(result.diagnoses.is_empty());
        assert_eq!(result.rounds, 0);
        assert!(result.termination.is_none());
    }

    #[test]
    fn test_merge_concatenates_in_specialty_order() {
        let set: OpinionSet = vec![
            opinion(Specialty::Radiology, &["Nodule"], 0.6),
            opinion(Specialty::Cardiology, &["Angina", "Nodule"], 0.8),
        ]
        .into_iter()
        .collect();
        let before = set.clone();
        let result = ConsensusMerger::new().merge(&set);

        assert_eq!(result.diagnoses, vec!["Angina", "Nodule", "Nodule"]);
        assert_eq!(
            result.recommendations,
            vec!["cardiology follow-up", "radiology follow-up"]
        );
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert_eq!(set, before);
    }

    #[test]
    fn test_all_errors_yield_zero_confidence() {
        let set: OpinionSet = Specialty::ALL
            .iter()
            .map(|s| Opinion::error(*s, "model unavailable"))
            .collect();
        let result = ConsensusMerger::new().merge(&set);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_merge_terminal_records_round() {
        let set: OpinionSet = vec![opinion(Specialty::Cardiology, &["Angina"], 0.9)]
            .into_iter()
            .collect();
        let result = ConsensusMerger::new().merge_terminal(&set, DebateState::Exhausted(3));
        assert_eq!(result.rounds, 3);
        assert_eq!(result.termination, Some(DebateState::Exhausted(3)));
        assert!(!result.converged());
    }

    #[test]
    fn test_weighted_confidence() {
        let weights = ConfidenceWeights::uniform()
            .with_weight(Specialty::Cardiology, 3.0)
            .unwrap();
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, &[], 0.8),
            opinion(Specialty::Oncology, &[], 0.4),
        ]
        .into_iter()
        .collect();
        let result = ConsensusMerger::new().with_weights(weights).merge(&set);
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_fall_back_to_mean() {
        let weights = ConfidenceWeights::uniform()
            .with_weight(Specialty::Cardiology, 0.0)
            .unwrap()
            .with_weight(Specialty::Oncology, 0.0)
            .unwrap();
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, &[], 0.8),
            opinion(Specialty::Oncology, &[], 0.4),
        ]
        .into_iter()
        .collect();
        let result = ConsensusMerger::new().with_weights(weights).merge(&set);
        assert!((result.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(ConfidenceWeights::uniform()
            .with_weight(Specialty::Oncology, -1.0)
            .is_err());
    }
}
