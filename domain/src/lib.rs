//! Domain layer for consilium
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Consultation
//!
//! A case is structured, matched against a closed set of [`Specialty`]
//! variants, and every selected specialty contributes an [`Opinion`]. The
//! per-specialty [`OpinionSet`] is revised in synchronized debate rounds
//! until the [`DebatePolicy`] reports agreement or the round budget runs
//! out, then folded into a [`ConsensusResult`].
//!
//! ## Tiered routing
//!
//! A [`ComplexityScore`] computed from case text picks a [`Tier`]:
//!
//! - **Local**: preliminary on-device analysis only
//! - **Hybrid**: local analysis verified by a remote consultation
//! - **Remote**: full multi-specialist consultation

pub mod case;
pub mod config;
pub mod consensus;
pub mod core;
pub mod opinion;
pub mod orchestration;
pub mod prompt;
pub mod report;
pub mod routing;
pub mod specialty;
pub mod sync;
pub mod util;

// Re-export commonly used types
pub use case::{CaseRecord, PatientInfo, StructuredCase};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AgreementPolicy, ConfidenceWeights, ConflictPolicy, ConsensusMerger, ConsensusPolicy,
    ConsensusPolicyKind, ConsensusResult, DebatePolicy, DebateState, NeverConverge,
    PluralityConflict, agreement_score,
};
pub use core::{error::DomainError, model::Model, model_config::ModelConfig};
pub use opinion::{
    DEFAULT_CONFIDENCE, Opinion, OpinionHistory, OpinionSet, RiskLevel, parse_opinion,
    parse_preliminary, parse_structured_case,
};
pub use orchestration::{Phase, PhaseTimings};
pub use prompt::PromptTemplate;
pub use report::{DiagnosticReport, ReportAssembler, ReportMetadata, ReportViews};
pub use routing::{
    ComplexityAssessment, ComplexityBand, ComplexityBounds, ComplexityScore, ComplexitySignal,
    RoutedResult, Tier, assess_complexity,
};
pub use specialty::{Specialty, SpecialtyProfile, SpecialtySelector};
pub use sync::{
    LocalAnalysis, LocalTierStatus, PreliminaryAssessment, SyncEntryId, SyncQueueEntry,
    SyncSummary,
};
