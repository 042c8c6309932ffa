//! Local processing tier
//!
//! Resource-constrained path: structure the case and produce a preliminary
//! assessment with the local model. While offline, every result is queued in
//! the [`SyncStore`] for a later [`sync`](LocalProcessingTier::sync) pass.
//!
//! The queue is the only shared mutable state in the engine. Enqueueing and
//! draining both hold `queue_lock`, so queue membership is never mutated by
//! two operations at once.

use super::producers::CaseStructurer;
use super::shared::complete_with_timeout;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, SamplingParams};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::sync_store::{RemoteUploader, SyncStore, SyncStoreError};
use consilium_domain::{
    CaseRecord, LocalAnalysis, LocalTierStatus, Model, Phase, PhaseTimings, PreliminaryAssessment,
    PromptTemplate, StructuredCase, SyncEntryId, SyncQueueEntry, SyncSummary, assess_complexity,
    parse_preliminary,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct LocalProcessingTier<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    structurer: Arc<dyn CaseStructurer>,
    model: Model,
    timeout: Duration,
    store: Arc<dyn SyncStore>,
    uploader: Arc<dyn RemoteUploader>,
    offline: AtomicBool,
    queue_lock: Mutex<()>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> LocalProcessingTier<G> {
    pub fn new(
        gateway: Arc<G>,
        structurer: Arc<dyn CaseStructurer>,
        model: Model,
        timeout: Duration,
        store: Arc<dyn SyncStore>,
        uploader: Arc<dyn RemoteUploader>,
    ) -> Self {
        Self {
            gateway,
            structurer,
            model,
            timeout,
            store,
            uploader,
            offline: AtomicBool::new(false),
            queue_lock: Mutex::new(()),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_offline_mode(self, offline: bool) -> Self {
        self.offline.store(offline, Ordering::SeqCst);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn set_offline_mode(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
        info!("Offline mode: {}", offline);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    pub async fn process(&self, case: &CaseRecord) -> LocalAnalysis {
        self.process_with_progress(case, &NoProgress).await
    }

    /// Structure and pre-assess one case; queue it when offline.
    pub async fn process_with_progress(
        &self,
        case: &CaseRecord,
        progress: &dyn ProgressNotifier,
    ) -> LocalAnalysis {
        let total = Instant::now();
        let offline = self.is_offline();
        info!("Local tier processing case (offline: {})", offline);
        let mut timings = PhaseTimings::new();

        let started = Instant::now();
        progress.on_phase_start(&Phase::Structuring, 1);
        let structured = self.structurer.structure(case).await;
        timings.record(Phase::Structuring, started.elapsed());
        progress.on_phase_complete(&Phase::Structuring, started.elapsed());

        let started = Instant::now();
        progress.on_phase_start(&Phase::LocalAnalysis, 1);
        let preliminary = self.analyze(&structured).await;
        timings.record(Phase::LocalAnalysis, started.elapsed());
        progress.on_task_complete(&Phase::LocalAnalysis, None, preliminary.confidence > 0.0);
        progress.on_phase_complete(&Phase::LocalAnalysis, started.elapsed());

        if preliminary.escalation_recommended {
            warn!(
                "Complex case detected (complexity {}) - recommend remote processing",
                preliminary.complexity.score
            );
        }

        let mut analysis = LocalAnalysis {
            structured,
            preliminary,
            offline,
            queued_as: None,
            timings,
        };

        if offline {
            analysis.queued_as = self.enqueue(&analysis).await;
        }

        debug!("Local processing complete in {:?}", total.elapsed());
        self.logger
            .log(ConversationEvent::new("local_analysis", json!(&analysis)));
        analysis
    }

    async fn analyze(&self, structured: &StructuredCase) -> PreliminaryAssessment {
        let complexity = assess_complexity(&structured.search_text());
        let request = CompletionRequest::new(
            self.model.clone(),
            PromptTemplate::local_system(),
            PromptTemplate::local_prompt(structured),
            SamplingParams::analyze(),
        );

        match complete_with_timeout(self.gateway.as_ref(), &request, self.timeout).await {
            Ok(text) => parse_preliminary(&text, complexity),
            Err(e) => {
                warn!("Local analysis failed: {}", e);
                let mut preliminary = parse_preliminary("", complexity);
                preliminary.summary = format!("Local analysis failed: {}", e);
                preliminary
            }
        }
    }

    async fn enqueue(&self, analysis: &LocalAnalysis) -> Option<SyncEntryId> {
        let created_at_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let entry = SyncQueueEntry {
            id: SyncEntryId::from_timestamp(created_at_ms),
            created_at_ms,
            analysis: analysis.clone(),
        };

        let _guard = self.queue_lock.lock().await;
        match self.store.enqueue(&entry).await {
            Ok(id) => {
                debug!("Stored for sync: {}", id);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to queue local result: {}", e);
                None
            }
        }
    }

    /// Upload every pending entry; refused while offline.
    ///
    /// Entries are removed only after a confirmed upload. Failed uploads stay
    /// queued for the next pass and are counted, never escalated.
    pub async fn sync(&self) -> Result<SyncSummary, SyncStoreError> {
        let _guard = self.queue_lock.lock().await;

        if self.is_offline() {
            warn!("Cannot sync in offline mode");
            let pending = self.store.list_pending().await?.len();
            return Ok(SyncSummary::refused_offline(pending));
        }

        let pending = self.store.list_pending().await?;
        info!("Syncing {} pending cases", pending.len());

        let mut synced = 0;
        let mut failed = 0;
        for id in pending {
            match self.upload_one(&id).await {
                Ok(true) => synced += 1,
                Ok(false) => {
                    warn!("Remote declined {}", id);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Sync error for {}: {}", id, e);
                    failed += 1;
                }
            }
        }

        let summary = SyncSummary {
            synced,
            failed,
            pending: self.store.list_pending().await?.len(),
            refused: false,
        };
        info!("Sync complete: {}", summary);
        self.logger.log(ConversationEvent::new("sync", json!(&summary)));
        Ok(summary)
    }

    async fn upload_one(&self, id: &SyncEntryId) -> Result<bool, SyncStoreError> {
        let entry = self.store.load(id).await?;
        if !self.uploader.upload(&entry).await? {
            return Ok(false);
        }
        self.store.remove(id).await?;
        Ok(true)
    }

    pub async fn status(&self) -> Result<LocalTierStatus, SyncStoreError> {
        Ok(LocalTierStatus {
            offline_mode: self.is_offline(),
            pending_sync: self.store.list_pending().await?.len(),
            cache_dir: self.store.location(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::ports::sync_store::InMemorySyncStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct FixedGateway(Result<String, GatewayError>);

    #[async_trait]
    impl LlmGateway for FixedGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            self.0.clone()
        }
    }

    struct RawStructurer;

    #[async_trait]
    impl CaseStructurer for RawStructurer {
        async fn structure(&self, case: &CaseRecord) -> StructuredCase {
            StructuredCase::from_raw(case)
        }
    }

    /// Uploader that accepts the first `accept` uploads and declines the rest.
    struct CountingUploader {
        accept: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl RemoteUploader for CountingUploader {
        async fn upload(&self, _entry: &SyncQueueEntry) -> Result<bool, SyncStoreError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(n < self.accept)
        }
    }

    fn tier(accept: usize, offline: bool) -> LocalProcessingTier<FixedGateway> {
        LocalProcessingTier::new(
            Arc::new(FixedGateway(Ok(
                r#"{"summary": "Possible cardiovascular issue", "recommendations": ["Monitor blood pressure"], "confidence": 0.82}"#.into(),
            ))),
            Arc::new(RawStructurer),
            Model::ErnieLite,
            Duration::from_secs(5),
            Arc::new(InMemorySyncStore::new()),
            Arc::new(CountingUploader {
                accept,
                attempts: AtomicUsize::new(0),
            }),
        )
        .with_offline_mode(offline)
    }

    #[tokio::test]
    async fn test_online_processing_is_not_queued() {
        let tier = tier(10, false);
        let analysis = tier.process(&CaseRecord::new("mild chest discomfort", 0.9)).await;
        assert!(!analysis.offline);
        assert!(analysis.queued_as.is_none());
        assert!((analysis.confidence() - 0.82).abs() < 1e-9);
        assert!(analysis.timings.get(Phase::LocalAnalysis).is_some());
        assert_eq!(tier.status().await.unwrap().pending_sync, 0);
    }

    #[tokio::test]
    async fn test_offline_processing_queues_result() {
        let tier = tier(10, true);
        let analysis = tier.process(&CaseRecord::new("mild chest discomfort", 0.9)).await;
        assert!(analysis.offline);
        assert!(analysis.queued_as.is_some());

        let status = tier.status().await.unwrap();
        assert!(status.offline_mode);
        assert_eq!(status.pending_sync, 1);
    }

    #[tokio::test]
    async fn test_sync_refused_while_offline() {
        let tier = tier(10, true);
        tier.process(&CaseRecord::new("cough", 0.9)).await;
        let summary = tier.sync().await.unwrap();
        assert!(summary.refused);
        assert_eq!(summary.synced, 0);
        assert_eq!(summary.pending, 1);
    }

    #[tokio::test]
    async fn test_sync_removes_only_confirmed_uploads() {
        let tier = tier(1, true);
        tier.process(&CaseRecord::new("cough", 0.9)).await;
        tier.process(&CaseRecord::new("fever", 0.9)).await;
        tier.set_offline_mode(false);

        let summary = tier.sync().await.unwrap();
        assert_eq!(summary.synced, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pending, 1);

        // The declined entry is retried on the next pass.
        let again = tier.sync().await.unwrap();
        assert_eq!(again.synced, 0);
        assert_eq!(again.failed, 1);
        assert_eq!(again.pending, 1);
    }

    #[tokio::test]
    async fn test_complex_case_recommends_escalation() {
        let tier = tier(10, false);
        let analysis = tier
            .process(&CaseRecord::new(
                "Multiple complications with atypical presentation",
                0.9,
            ))
            .await;
        assert!(analysis.preliminary.escalation_recommended);
        assert!(analysis.preliminary.complexity.score.value() > 0.7);
    }

    #[tokio::test]
    async fn test_model_failure_yields_zero_confidence() {
        let tier = LocalProcessingTier::new(
            Arc::new(FixedGateway(Err(GatewayError::ConnectionError("down".into())))),
            Arc::new(RawStructurer),
            Model::ErnieLite,
            Duration::from_secs(5),
            Arc::new(InMemorySyncStore::new()),
            Arc::new(CountingUploader {
                accept: 0,
                attempts: AtomicUsize::new(0),
            }),
        );
        let analysis = tier.process(&CaseRecord::new("cough", 0.9)).await;
        assert_eq!(analysis.confidence(), 0.0);
        assert!(analysis.preliminary.summary.contains("down"));
    }
}
