//! Application layer for consilium
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigError, DiagnosisParams, EngineConfig, ExecutionParams, RoutingParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    extractor::{Extraction, ExtractionError, TextExtractor, case_from_extraction},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway, SamplingParams},
    progress::{NoProgress, ProgressNotifier},
    sync_store::{InMemorySyncStore, RemoteUploader, SyncStore, SyncStoreError},
};
pub use use_cases::debate::{DebateCoordinator, DebateOutcome};
pub use use_cases::local_tier::LocalProcessingTier;
pub use use_cases::producers::{
    CaseStructurer, LlmCaseStructurer, LlmSpecialist, OpinionProducer, ProducerRegistry,
};
pub use use_cases::route_case::{ComplexityRouter, RouteCaseError};
pub use use_cases::run_diagnosis::{DiagnosisOrchestrator, RunDiagnosisError};
pub use use_cases::worker_pool::{PoolCancelled, WorkerPool};
