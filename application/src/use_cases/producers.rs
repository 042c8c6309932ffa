//! Opinion producers
//!
//! An [`OpinionProducer`] is one specialty's capability set: analyze a case,
//! revise an opinion against peers, and describe its expertise. The
//! structuring step is a separate [`CaseStructurer`]; it only analyzes and
//! never takes part in debate.
//!
//! Producers never fail. Any collaborator error (unavailable model, timeout,
//! unparseable output) becomes an error opinion with confidence 0.0 or a
//! degraded structured projection.

use super::shared::complete_with_timeout;
use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, SamplingParams};
use async_trait::async_trait;
use consilium_domain::{
    CaseRecord, Model, ModelConfig, Opinion, PromptTemplate, Specialty, SpecialtyProfile,
    StructuredCase, parse_opinion, parse_structured_case,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait OpinionProducer: Send + Sync {
    fn specialty(&self) -> Specialty;

    fn describe_expertise(&self) -> &str;

    /// Initial opinion for a case (round 0).
    async fn analyze(&self, case: &StructuredCase) -> Opinion;

    /// New opinion replacing `current`, informed by `peers`.
    ///
    /// Peers sharing this producer's specialty are ignored.
    async fn revise(&self, current: &Opinion, peers: &[Opinion]) -> Opinion;
}

#[async_trait]
pub trait CaseStructurer: Send + Sync {
    async fn structure(&self, case: &CaseRecord) -> StructuredCase;
}

/// Specialist backed by a language model.
pub struct LlmSpecialist<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    profile: &'static SpecialtyProfile,
    model: Model,
    timeout: Duration,
    max_tokens: Option<u32>,
}

impl<G: LlmGateway + 'static> LlmSpecialist<G> {
    pub fn new(gateway: Arc<G>, specialty: Specialty, model: Model, timeout: Duration) -> Self {
        Self {
            gateway,
            profile: specialty.profile(),
            model,
            timeout,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn sampling(&self, base: SamplingParams) -> SamplingParams {
        match self.max_tokens {
            Some(max) => base.with_max_tokens(max),
            None => base,
        }
    }

    async fn consult(&self, user_prompt: String, sampling: SamplingParams, round: usize) -> Opinion {
        let specialty = self.profile.specialty;
        let request = CompletionRequest::new(
            self.model.clone(),
            self.profile.system_prompt,
            user_prompt,
            self.sampling(sampling),
        );

        match complete_with_timeout(self.gateway.as_ref(), &request, self.timeout).await {
            Ok(text) => {
                debug!("{} responded ({} bytes)", specialty, text.len());
                parse_opinion(specialty, round, &text)
            }
            Err(e) => {
                warn!("{} consultation failed: {}", specialty, e);
                Opinion::error(specialty, e.to_string()).in_round(round)
            }
        }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> OpinionProducer for LlmSpecialist<G> {
    fn specialty(&self) -> Specialty {
        self.profile.specialty
    }

    fn describe_expertise(&self) -> &str {
        self.profile.expertise
    }

    async fn analyze(&self, case: &StructuredCase) -> Opinion {
        let prompt = PromptTemplate::specialist_prompt(self.profile, case);
        self.consult(prompt, SamplingParams::analyze(), 0).await
    }

    async fn revise(&self, current: &Opinion, peers: &[Opinion]) -> Opinion {
        let own = self.profile.specialty;
        let peers: Vec<Opinion> = peers
            .iter()
            .filter(|p| p.specialty != own)
            .cloned()
            .collect();
        let prompt = PromptTemplate::revision_prompt(current, &peers);
        self.consult(prompt, SamplingParams::revise(), current.round + 1)
            .await
    }
}

/// Structuring producer backed by a language model.
pub struct LlmCaseStructurer<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: Model,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> LlmCaseStructurer<G> {
    pub fn new(gateway: Arc<G>, model: Model, timeout: Duration) -> Self {
        Self {
            gateway,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> CaseStructurer for LlmCaseStructurer<G> {
    async fn structure(&self, case: &CaseRecord) -> StructuredCase {
        if let Some(existing) = case.structured() {
            debug!("Case already structured; skipping model call");
            return existing.clone();
        }
        if case.raw_text().trim().is_empty() {
            return StructuredCase::degraded(case, "no text was extracted");
        }

        let request = CompletionRequest::new(
            self.model.clone(),
            PromptTemplate::structuring_system(),
            PromptTemplate::structuring_prompt(case),
            SamplingParams::analyze(),
        );

        match complete_with_timeout(self.gateway.as_ref(), &request, self.timeout).await {
            Ok(text) => parse_structured_case(case, &text),
            Err(e) => {
                warn!("Structuring failed: {}", e);
                StructuredCase::degraded(case, e.to_string())
            }
        }
    }
}

/// The producer set an orchestrator owns.
#[derive(Clone)]
pub struct ProducerRegistry {
    structurer: Arc<dyn CaseStructurer>,
    specialists: BTreeMap<Specialty, Arc<dyn OpinionProducer>>,
}

impl ProducerRegistry {
    pub fn new(structurer: Arc<dyn CaseStructurer>) -> Self {
        Self {
            structurer,
            specialists: BTreeMap::new(),
        }
    }

    /// LLM-backed structurer plus one specialist per specialty.
    pub fn llm<G: LlmGateway + 'static>(
        gateway: Arc<G>,
        models: &ModelConfig,
        execution: &ExecutionParams,
        max_tokens: Option<u32>,
    ) -> Self {
        let timeout = execution.call_timeout;
        let mut registry = Self::new(Arc::new(LlmCaseStructurer::new(
            Arc::clone(&gateway),
            models.structuring.clone(),
            timeout,
        )));
        for specialty in Specialty::ALL {
            registry = registry.with_producer(Arc::new(
                LlmSpecialist::new(
                    Arc::clone(&gateway),
                    specialty,
                    models.specialist(specialty),
                    timeout,
                )
                .with_max_tokens(max_tokens),
            ));
        }
        registry
    }

    /// Register (or replace) the producer for its specialty.
    pub fn with_producer(mut self, producer: Arc<dyn OpinionProducer>) -> Self {
        self.specialists.insert(producer.specialty(), producer);
        self
    }

    pub fn structurer(&self) -> Arc<dyn CaseStructurer> {
        Arc::clone(&self.structurer)
    }

    pub fn get(&self, specialty: Specialty) -> Option<Arc<dyn OpinionProducer>> {
        self.specialists.get(&specialty).cloned()
    }

    pub fn specialties(&self) -> impl Iterator<Item = Specialty> + '_ {
        self.specialists.keys().copied()
    }

    /// Expertise statements of the registered producers among `specialties`.
    pub fn panel(&self, specialties: &[Specialty]) -> BTreeMap<Specialty, String> {
        specialties
            .iter()
            .filter_map(|s| {
                self.specialists
                    .get(s)
                    .map(|p| (*s, p.describe_expertise().to_string()))
            })
            .collect()
    }
}
