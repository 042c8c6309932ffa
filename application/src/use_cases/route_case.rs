//! Route Case use case
//!
//! Scores a case and dispatches it by band:
//!
//! | Band    | Tier   | Path                                              |
//! |---------|--------|---------------------------------------------------|
//! | simple  | local  | local tier only                                   |
//! | medium  | hybrid | local tier, then remote verification, mean conf.  |
//! | complex | remote | full diagnosis orchestrator                       |
//!
//! While the local tier is offline, bands needing the remote side are
//! processed locally and queued; the result records the deferred tier.

use super::local_tier::LocalProcessingTier;
use super::run_diagnosis::{DiagnosisOrchestrator, RunDiagnosisError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use consilium_domain::{
    CaseRecord, ComplexityBounds, Phase, PromptTemplate, RoutedResult, Tier, assess_complexity,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum RouteCaseError {
    #[error(transparent)]
    Diagnosis(#[from] RunDiagnosisError),
}

pub struct ComplexityRouter<G: LlmGateway + 'static> {
    local: Arc<LocalProcessingTier<G>>,
    remote: Arc<DiagnosisOrchestrator>,
    bounds: ComplexityBounds,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> ComplexityRouter<G> {
    pub fn new(
        local: Arc<LocalProcessingTier<G>>,
        remote: Arc<DiagnosisOrchestrator>,
        bounds: ComplexityBounds,
    ) -> Self {
        Self {
            local,
            remote,
            bounds,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn route(&self, case: &CaseRecord) -> Result<RoutedResult, RouteCaseError> {
        self.route_with_progress(case, &NoProgress, None).await
    }

    pub async fn route_with_progress(
        &self,
        case: &CaseRecord,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<RoutedResult, RouteCaseError> {
        let assessment = assess_complexity(&case.search_text());
        let band = assessment.band(&self.bounds);
        let tier = band.tier();
        info!("Case complexity: {} ({})", assessment.score, band);
        progress.on_route_decision(&assessment, tier);

        let mut result = RoutedResult {
            complexity: assessment.score.value(),
            band,
            signals: assessment.signals.clone(),
            processed_by: tier,
            confidence: 0.0,
            deferred_tier: None,
            local: None,
            verification: None,
            report: None,
        };

        if tier.needs_remote() && self.local.is_offline() {
            info!("Offline: deferring {} tier, processing locally", tier);
            let local = self.local.process_with_progress(case, progress).await;
            result.processed_by = Tier::Local;
            result.deferred_tier = Some(tier);
            result.confidence = local.confidence();
            result.local = Some(local);
            return Ok(self.finish(result));
        }

        match tier {
            Tier::Local => {
                info!("Routing to local tier");
                let local = self.local.process_with_progress(case, progress).await;
                result.confidence = local.confidence();
                result.local = Some(local);
            }
            Tier::Hybrid => {
                info!("Routing to hybrid (local + remote verification)");
                let local = self.local.process_with_progress(case, progress).await;

                let started = Instant::now();
                progress.on_phase_start(&Phase::Verification, 1);
                let verification_case = CaseRecord::new(
                    PromptTemplate::verification_case_text(&local),
                    case.extraction_confidence(),
                );
                let report = self
                    .remote
                    .execute_with_progress(&verification_case, progress, cancellation)
                    .await?;
                progress.on_phase_complete(&Phase::Verification, started.elapsed());

                result.confidence = (local.confidence() + report.consensus.confidence) / 2.0;
                result.local = Some(local);
                result.verification = Some(report);
            }
            Tier::Remote => {
                info!("Routing to remote tier");
                let report = self
                    .remote
                    .execute_with_progress(case, progress, cancellation)
                    .await?;
                result.confidence = report.consensus.confidence;
                result.report = Some(report);
            }
        }

        Ok(self.finish(result))
    }

    fn finish(&self, result: RoutedResult) -> RoutedResult {
        self.logger.log(ConversationEvent::new(
            "route",
            json!({
                "complexity": result.complexity,
                "band": result.band,
                "signals": result.signals,
                "processed_by": result.processed_by,
                "deferred_tier": result.deferred_tier,
                "confidence": result.confidence,
            }),
        ));
        result
    }
}
