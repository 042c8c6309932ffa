use serde::{Deserialize, Serialize};

/// State of the debate round machine.
///
/// `Converged` and `Exhausted` are terminal; both proceed to merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "round", rename_all = "snake_case")]
pub enum DebateState {
    /// Initial opinions collected, no revision yet
    Seeded,
    /// Revision round in progress (1-based)
    Debating(usize),
    /// Agreement reached, or nothing to resolve
    Converged(usize),
    /// Round budget spent without agreement
    Exhausted(usize),
}

impl DebateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DebateState::Converged(_) | DebateState::Exhausted(_))
    }

    /// Round index the state refers to (0 for `Seeded`).
    pub fn round(&self) -> usize {
        match self {
            DebateState::Seeded => 0,
            DebateState::Debating(r) | DebateState::Converged(r) | DebateState::Exhausted(r) => *r,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebateState::Seeded => "seeded",
            DebateState::Debating(_) => "debating",
            DebateState::Converged(_) => "converged",
            DebateState::Exhausted(_) => "exhausted",
        }
    }
}

impl std::fmt::Display for DebateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebateState::Seeded => write!(f, "seeded"),
            other => write!(f, "{} (round {})", other.as_str(), other.round()),
        }
    }
}
