//! Progress notification port
//!
//! Defines the interface for reporting progress during diagnosis and routing.

use consilium_domain::{ComplexityAssessment, Phase, Specialty, Tier};
use std::time::Duration;

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when one producer call completes within a phase
    fn on_task_complete(&self, phase: &Phase, specialty: Option<Specialty>, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase, elapsed: Duration);

    /// Called after each debate round with the agreement it reached.
    fn on_debate_round(&self, _round: usize, _max_rounds: usize, _agreement: f64) {}

    /// Called once the router has picked a tier.
    fn on_route_decision(&self, _assessment: &ComplexityAssessment, _tier: Tier) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _specialty: Option<Specialty>, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase, _elapsed: Duration) {}
}
