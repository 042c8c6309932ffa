use crate::case::StructuredCase;
use crate::orchestration::PhaseTimings;
use crate::routing::ComplexityAssessment;
use serde::{Deserialize, Serialize};

/// Complexity above which the local tier recommends escalation.
pub const ESCALATION_THRESHOLD: f64 = 0.7;

/// Identifier of a queued local result (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncEntryId(String);

impl SyncEntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id derived from a creation timestamp in milliseconds.
    pub fn from_timestamp(created_at_ms: u64) -> Self {
        Self(format!("case_{}", created_at_ms))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SyncEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Preliminary local-tier assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreliminaryAssessment {
    pub summary: String,
    #[serde(default)]
    pub diagnoses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub confidence: f64,
    pub complexity: ComplexityAssessment,
    /// Set when the local tier itself judges the case too complex
    pub escalation_recommended: bool,
}

impl PreliminaryAssessment {
    pub fn needs_escalation(complexity: &ComplexityAssessment) -> bool {
        complexity.score.value() > ESCALATION_THRESHOLD
    }
}

/// Everything the local tier produced for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAnalysis {
    pub structured: StructuredCase,
    pub preliminary: PreliminaryAssessment,
    /// Offline mode at processing time
    pub offline: bool,
    /// Sync queue entry, when the result was queued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_as: Option<SyncEntryId>,
    #[serde(default)]
    pub timings: PhaseTimings,
}

impl LocalAnalysis {
    pub fn confidence(&self) -> f64 {
        self.preliminary.confidence
    }
}

/// A local result awaiting upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncQueueEntry {
    pub id: SyncEntryId,
    pub created_at_ms: u64,
    pub analysis: LocalAnalysis,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub synced: usize,
    pub failed: usize,
    pub pending: usize,
    /// Sync was refused because the tier is offline
    #[serde(default)]
    pub refused: bool,
}

impl SyncSummary {
    pub fn refused_offline(pending: usize) -> Self {
        Self {
            synced: 0,
            failed: 0,
            pending,
            refused: true,
        }
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.refused {
            return write!(f, "sync refused (offline), {} pending", self.pending);
        }
        write!(
            f,
            "{} synced, {} failed, {} pending",
            self.synced, self.failed, self.pending
        )
    }
}

/// Snapshot of the local tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTierStatus {
    pub offline_mode: bool,
    pub pending_sync: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{ComplexitySignal, ComplexityAssessment};

    #[test]
    fn test_entry_id_from_timestamp() {
        assert_eq!(SyncEntryId::from_timestamp(1700000000123).as_str(), "case_1700000000123");
    }

    #[test]
    fn test_escalation_threshold_is_exclusive() {
        let at = ComplexityAssessment::from_signals(vec![
            ComplexitySignal::MultipleConditions,
            ComplexitySignal::ImagingRequired,
        ]);
        assert!(!PreliminaryAssessment::needs_escalation(&at));

        let above = ComplexityAssessment::from_signals(vec![
            ComplexitySignal::MultipleConditions,
            ComplexitySignal::RareCondition,
        ]);
        assert!(PreliminaryAssessment::needs_escalation(&above));
    }

    #[test]
    fn test_summary_display() {
        let summary = SyncSummary {
            synced: 2,
            failed: 1,
            pending: 1,
            refused: false,
        };
        assert_eq!(summary.to_string(), "2 synced, 1 failed, 1 pending");
        assert_eq!(
            SyncSummary::refused_offline(3).to_string(),
            "sync refused (offline), 3 pending"
        );
    }
}
