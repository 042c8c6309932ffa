//! Run Diagnosis use case
//!
//! Orchestrates the full multi-specialist consultation flow:
//! structure → select → consult → debate-or-merge → assemble.

use super::debate::DebateCoordinator;
use super::producers::ProducerRegistry;
use super::worker_pool::{PoolCancelled, WorkerPool};
use crate::config::{ConfigError, DiagnosisParams, EngineConfig};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use consilium_domain::{
    CaseRecord, ConsensusMerger, DiagnosticReport, Opinion, OpinionHistory, OpinionSet, Phase,
    PhaseTimings, ReportAssembler, Specialty, SpecialtySelector, StructuredCase,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur during a diagnosis run
///
/// Collaborator failures never show up here; they degrade the report instead.
#[derive(Error, Debug)]
pub enum RunDiagnosisError {
    #[error("Diagnosis cancelled")]
    Cancelled,

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl From<PoolCancelled> for RunDiagnosisError {
    fn from(_: PoolCancelled) -> Self {
        RunDiagnosisError::Cancelled
    }
}

/// Top-level sequencing of one consultation.
pub struct DiagnosisOrchestrator {
    producers: ProducerRegistry,
    params: DiagnosisParams,
    selector: SpecialtySelector,
    merger: ConsensusMerger,
    assembler: ReportAssembler,
    debate: DebateCoordinator,
    pool: WorkerPool,
    logger: Arc<dyn ConversationLogger>,
}

impl DiagnosisOrchestrator {
    /// Build an orchestrator; fails on any configuration error.
    pub fn new(producers: ProducerRegistry, config: &EngineConfig) -> Result<Self, ConfigError> {
        for warning in config.check()? {
            warn!("{}", warning);
        }

        let params = config.diagnosis.clone();
        let pool = WorkerPool::new(config.execution.max_concurrency);
        Ok(Self {
            producers,
            selector: SpecialtySelector::new(params.default_specialty),
            merger: ConsensusMerger::new().with_weights(params.weights.clone()),
            assembler: ReportAssembler,
            debate: DebateCoordinator::new(
                params.debate_policy(),
                params.max_debate_rounds,
                pool.clone(),
            ),
            pool,
            params,
            logger: Arc::new(NoConversationLogger),
        })
    }

    /// Orchestrator with LLM-backed producers for every specialty.
    pub fn with_gateway<G: LlmGateway + 'static>(
        gateway: Arc<G>,
        config: &EngineConfig,
        max_tokens: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let producers = ProducerRegistry::llm(gateway, &config.models, &config.execution, max_tokens);
        Self::new(producers, config)
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &DiagnosisParams {
        &self.params
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, case: &CaseRecord) -> Result<DiagnosticReport, RunDiagnosisError> {
        self.execute_with_progress(case, &NoProgress, None).await
    }

    /// Execute with progress callbacks and optional cancellation
    pub async fn execute_with_progress(
        &self,
        case: &CaseRecord,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<DiagnosticReport, RunDiagnosisError> {
        info!("Starting diagnosis");
        let mut timings = PhaseTimings::new();

        // Phase 1: Structuring
        let started = Instant::now();
        let structured = self.phase_structuring(case, progress, cancellation).await?;
        timings.record(Phase::Structuring, started.elapsed());
        progress.on_phase_complete(&Phase::Structuring, started.elapsed());

        // Phase 2: Selection
        let started = Instant::now();
        progress.on_phase_start(&Phase::Selection, 1);
        let specialties = self.selector.select(&structured);
        info!("Required specialties: {:?}", specialties);
        let panel = self.producers.panel(&specialties);
        self.logger.log(ConversationEvent::new("panel", json!(&panel)));
        timings.record(Phase::Selection, started.elapsed());
        progress.on_phase_complete(&Phase::Selection, started.elapsed());

        // Phase 3: Consultation
        let started = Instant::now();
        let seed = self
            .phase_consultation(&structured, &specialties, progress, cancellation)
            .await?;
        timings.record(Phase::Consultation, started.elapsed());
        progress.on_phase_complete(&Phase::Consultation, started.elapsed());

        // Phase 4: Debate or direct merge
        let debate = self.params.enable_debate && seed.len() > 1;
        let (history, consensus) = if debate {
            info!("Starting specialist debate");
            let started = Instant::now();
            let outcome = self
                .debate
                .run(seed, &self.producers, progress, cancellation)
                .await?;
            timings.record(Phase::Debate, started.elapsed());
            progress.on_phase_complete(&Phase::Debate, started.elapsed());

            for (round, set) in outcome.history.rounds().iter().enumerate().skip(1) {
                self.logger.log(ConversationEvent::new(
                    "debate_round",
                    json!({ "round": round, "opinions": set }),
                ));
            }

            let started = Instant::now();
            let consensus = self.merger.merge_terminal(&outcome.final_set, outcome.state);
            timings.record(Phase::Merge, started.elapsed());
            (outcome.history, consensus)
        } else {
            let started = Instant::now();
            let consensus = self.merger.merge(&seed);
            timings.record(Phase::Merge, started.elapsed());
            (OpinionHistory::seeded(seed), consensus)
        };

        info!(
            "Consensus: confidence {:.2}, {} rounds",
            consensus.confidence, consensus.rounds
        );
        self.logger
            .log(ConversationEvent::new("consensus", json!(&consensus)));

        // Phase 5: Report
        let started = Instant::now();
        let mut report =
            self.assembler
                .assemble(structured, history, consensus, self.params.enable_debate);
        timings.record(Phase::Report, started.elapsed());
        report.panel = panel;
        report.timings = timings;

        info!("Diagnosis complete");
        Ok(report)
    }

    async fn phase_structuring(
        &self,
        case: &CaseRecord,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<StructuredCase, RunDiagnosisError> {
        info!("Phase 1: Case structuring");
        progress.on_phase_start(&Phase::Structuring, 1);

        let structurer = self.producers.structurer();
        let owned = case.clone();
        let mut results = self
            .pool
            .run_all(
                vec![async move { structurer.structure(&owned).await }],
                cancellation,
            )
            .await?;

        let structured = match results.pop() {
            Some(Ok(structured)) => structured,
            Some(Err(e)) => {
                warn!("Structuring task failed: {}", e);
                StructuredCase::degraded(case, e.to_string())
            }
            None => StructuredCase::degraded(case, "structuring produced no result"),
        };
        progress.on_task_complete(&Phase::Structuring, None, structured.confidence > 0.0);
        self.logger
            .log(ConversationEvent::new("structured_case", json!(&structured)));
        Ok(structured)
    }

    async fn phase_consultation(
        &self,
        structured: &StructuredCase,
        specialties: &[Specialty],
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<OpinionSet, RunDiagnosisError> {
        info!("Phase 3: Specialist consultation");
        progress.on_phase_start(&Phase::Consultation, specialties.len());

        let case = Arc::new(structured.clone());
        let tasks: Vec<_> = specialties
            .iter()
            .map(|&specialty| {
                let case = Arc::clone(&case);
                let producer = self.producers.get(specialty);
                async move {
                    match producer {
                        Some(producer) => producer.analyze(&case).await,
                        None => Opinion::error(specialty, "no producer registered"),
                    }
                }
            })
            .collect();

        let results = self.pool.run_all(tasks, cancellation).await?;

        let seed: OpinionSet = specialties
            .iter()
            .zip(results)
            .map(|(&specialty, result)| {
                let opinion = match result {
                    Ok(opinion) => opinion,
                    Err(e) => {
                        warn!("Consultation task for {} failed: {}", specialty, e);
                        Opinion::error(specialty, format!("consultation task failed: {}", e))
                    }
                };
                if opinion.is_error() {
                    warn!("{} returned an error opinion", specialty);
                } else {
                    info!("{} responded successfully", specialty);
                }
                progress.on_task_complete(&Phase::Consultation, Some(specialty), !opinion.is_error());
                self.logger
                    .log(ConversationEvent::new("opinion", json!(&opinion)));
                opinion
            })
            .collect();

        Ok(seed)
    }
}
