//! Local tier results and the sync queue that carries them upstream.

pub mod entities;

pub use entities::{
    ESCALATION_THRESHOLD, LocalAnalysis, LocalTierStatus, PreliminaryAssessment, SyncEntryId,
    SyncQueueEntry, SyncSummary,
};
