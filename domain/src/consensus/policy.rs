//! Debate policies
//!
//! The debate loop asks two questions of the current Opinion Set: is there
//! anything to resolve ([`ConflictPolicy`]) and, after a revision round, has
//! the panel agreed ([`ConsensusPolicy`]). Both are pluggable.

use super::agreement::agreement_score;
use crate::opinion::OpinionSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decides whether an Opinion Set needs revision at all.
pub trait ConflictPolicy: Send + Sync + std::fmt::Debug {
    fn has_conflict(&self, set: &OpinionSet) -> bool;
}

/// Decides whether a revised Opinion Set is settled.
pub trait ConsensusPolicy: Send + Sync + std::fmt::Debug {
    /// `round` is the 1-based index of the round that produced `set`.
    fn is_consensus(&self, set: &OpinionSet, round: usize, max_rounds: usize) -> bool;
}

/// Conflict whenever more than one opinion is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralityConflict;

impl ConflictPolicy for PluralityConflict {
    fn has_conflict(&self, set: &OpinionSet) -> bool {
        set.len() > 1
    }
}

/// Never settles early; the debate runs until the round budget is spent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConverge;

impl ConsensusPolicy for NeverConverge {
    fn is_consensus(&self, _set: &OpinionSet, _round: usize, _max_rounds: usize) -> bool {
        false
    }
}

/// Agreement-threshold policy.
///
/// Conflict while [`agreement_score`] is below `threshold`; consensus once it
/// reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgreementPolicy {
    pub threshold: f64,
}

impl AgreementPolicy {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

impl ConflictPolicy for AgreementPolicy {
    fn has_conflict(&self, set: &OpinionSet) -> bool {
        agreement_score(set) < self.threshold
    }
}

impl ConsensusPolicy for AgreementPolicy {
    fn is_consensus(&self, set: &OpinionSet, _round: usize, _max_rounds: usize) -> bool {
        agreement_score(set) >= self.threshold
    }
}

/// Named policy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusPolicyKind {
    /// [`AgreementPolicy`] for both predicates
    #[default]
    Agreement,
    /// [`PluralityConflict`] + [`NeverConverge`]: always debate to the budget
    FullDebate,
}

impl ConsensusPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusPolicyKind::Agreement => "agreement",
            ConsensusPolicyKind::FullDebate => "full_debate",
        }
    }
}

impl std::str::FromStr for ConsensusPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "agreement" => Ok(ConsensusPolicyKind::Agreement),
            "full_debate" | "full" => Ok(ConsensusPolicyKind::FullDebate),
            other => Err(format!("unknown consensus policy: {}", other)),
        }
    }
}

/// The pair of predicates a debate runs with.
#[derive(Debug, Clone)]
pub struct DebatePolicy {
    pub conflict: Arc<dyn ConflictPolicy>,
    pub consensus: Arc<dyn ConsensusPolicy>,
}

impl DebatePolicy {
    pub fn new(conflict: Arc<dyn ConflictPolicy>, consensus: Arc<dyn ConsensusPolicy>) -> Self {
        Self {
            conflict,
            consensus,
        }
    }

    pub fn agreement(threshold: f64) -> Self {
        let policy = Arc::new(AgreementPolicy::new(threshold));
        Self::new(policy.clone(), policy)
    }

    pub fn full_debate() -> Self {
        Self::new(Arc::new(PluralityConflict), Arc::new(NeverConverge))
    }

    pub fn from_kind(kind: ConsensusPolicyKind, threshold: f64) -> Self {
        match kind {
            ConsensusPolicyKind::Agreement => Self::agreement(threshold),
            ConsensusPolicyKind::FullDebate => Self::full_debate(),
        }
    }
}

impl Default for DebatePolicy {
    fn default() -> Self {
        Self::agreement(0.85)
    }
}
