//! Consensus domain
//!
//! Everything needed to turn an [`OpinionSet`](crate::opinion::OpinionSet) into one
//! aggregate result:
//!
//! ```text
//! Seeded ──► Debating(1) ──► ... ──► Debating(r) ──┬──► Converged(r)
//!    │                                             └──► Exhausted(R)
//!    └── fewer than 2 opinions / no conflict ─────────► Converged(0)
//! ```
//!
//! - [`DebateState`]: the round state machine
//! - [`ConflictPolicy`] / [`ConsensusPolicy`]: pluggable predicates driving it
//! - [`agreement_score`]: confidence-weighted overlap of diagnosis candidates
//! - [`ConsensusMerger`]: folds the terminal set into a [`ConsensusResult`]

pub mod agreement;
pub mod merge;
pub mod policy;
pub mod state;

pub use agreement::{agreement_score, normalize_candidate, pairwise_overlap};
pub use merge::{ConfidenceWeights, ConsensusMerger, ConsensusResult, EMPTY_SET_CONFIDENCE};
pub use policy::{
    AgreementPolicy, ConflictPolicy, ConsensusPolicy, ConsensusPolicyKind, DebatePolicy,
    NeverConverge, PluralityConflict,
};
pub use state::DebateState;
