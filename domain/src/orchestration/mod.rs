//! Orchestration domain - pipeline phases shared by the diagnosis and
//! local-tier flows.

pub mod phase;

pub use phase::{Phase, PhaseTiming, PhaseTimings};
