//! Pipeline phases and their timings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A step of the diagnosis or local-tier pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Raw case → structured projection
    Structuring,
    /// Specialty selection
    Selection,
    /// Initial per-specialty analysis
    Consultation,
    /// Revision rounds
    Debate,
    /// Consensus merge
    Merge,
    /// Report assembly
    Report,
    /// Local-tier preliminary analysis
    LocalAnalysis,
    /// Remote verification of a local result
    Verification,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Structuring => "structuring",
            Phase::Selection => "selection",
            Phase::Consultation => "consultation",
            Phase::Debate => "debate",
            Phase::Merge => "merge",
            Phase::Report => "report",
            Phase::LocalAnalysis => "local_analysis",
            Phase::Verification => "verification",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Structuring => "Case Structuring",
            Phase::Selection => "Specialty Selection",
            Phase::Consultation => "Specialist Consultation",
            Phase::Debate => "Debate",
            Phase::Merge => "Consensus Merge",
            Phase::Report => "Report Assembly",
            Phase::LocalAnalysis => "Local Analysis",
            Phase::Verification => "Remote Verification",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Wall-clock duration of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: Phase,
    pub millis: u64,
}

/// Ordered phase durations; observability only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseTimings {
    entries: Vec<PhaseTiming>,
}

impl PhaseTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        self.entries.push(PhaseTiming {
            phase,
            millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
    }

    pub fn get(&self, phase: Phase) -> Option<u64> {
        self.entries
            .iter()
            .find(|t| t.phase == phase)
            .map(|t| t.millis)
    }

    pub fn total_millis(&self) -> u64 {
        self.entries.iter().map(|t| t.millis).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseTiming> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut timings = PhaseTimings::new();
        timings.record(Phase::Structuring, Duration::from_millis(120));
        timings.record(Phase::LocalAnalysis, Duration::from_millis(80));
        assert_eq!(timings.get(Phase::Structuring), Some(120));
        assert_eq!(timings.get(Phase::Debate), None);
        assert_eq!(timings.total_millis(), 200);
    }
}
