use super::complexity::{ComplexityBand, ComplexitySignal};
use super::tier::Tier;
use crate::report::DiagnosticReport;
use crate::sync::LocalAnalysis;
use serde::{Deserialize, Serialize};

/// Output of routing one case.
///
/// The complexity score is always present so the routing decision can be
/// audited independently of its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedResult {
    pub complexity: f64,
    pub band: ComplexityBand,
    pub signals: Vec<ComplexitySignal>,
    pub processed_by: Tier,
    /// Final confidence; for hybrid the mean of local and verification
    pub confidence: f64,
    /// Tier the band asked for when it could not be reached (offline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalAnalysis>,
    /// Remote verification of the local result (hybrid only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<DiagnosticReport>,
    /// Full remote report (remote only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<DiagnosticReport>,
}

impl RoutedResult {
    pub fn was_deferred(&self) -> bool {
        self.deferred_tier.is_some()
    }
}
