//! Debate coordinator
//!
//! Drives synchronized revision rounds over an Opinion Set:
//!
//! 1. Stop (`Converged`) when fewer than two opinions remain or the conflict
//!    predicate finds nothing to resolve.
//! 2. Stop (`Exhausted`) when the round budget is spent.
//! 3. Otherwise snapshot the set, revise every member in parallel against its
//!    peers in the snapshot, and replace the set once all revisions are in.
//! 4. Stop (`Converged`) if the consensus predicate accepts the new set.
//!
//! No revision ever observes another revision from the same round, and a
//! round is never partially applied.

use super::producers::ProducerRegistry;
use super::worker_pool::{PoolCancelled, WorkerPool};
use crate::ports::progress::ProgressNotifier;
use consilium_domain::{
    DebatePolicy, DebateState, Opinion, OpinionHistory, OpinionSet, Phase, agreement_score,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Terminal result of a debate.
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    /// Set the debate ended with
    pub final_set: OpinionSet,
    /// Seed plus one set per completed round
    pub history: OpinionHistory,
    /// `Converged` or `Exhausted`
    pub state: DebateState,
}

pub struct DebateCoordinator {
    policy: DebatePolicy,
    max_rounds: usize,
    pool: WorkerPool,
}

impl DebateCoordinator {
    pub fn new(policy: DebatePolicy, max_rounds: usize, pool: WorkerPool) -> Self {
        Self {
            policy,
            max_rounds,
            pool,
        }
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Run rounds until a terminal state.
    ///
    /// Returns `Err(PoolCancelled)` if cancelled mid-round; the unfinished
    /// round is discarded entirely.
    pub async fn run(
        &self,
        seed: OpinionSet,
        producers: &ProducerRegistry,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<DebateOutcome, PoolCancelled> {
        let mut history = OpinionHistory::seeded(seed.clone());
        let mut current = seed;
        let mut round = 0;
        let mut state = DebateState::Seeded;
        debug!("Debate state: {}", state);

        let state = loop {
            if current.len() < 2 || !self.policy.conflict.has_conflict(&current) {
                info!("No conflict to resolve after round {}", round);
                break DebateState::Converged(round);
            }
            if round >= self.max_rounds {
                break DebateState::Exhausted(round);
            }

            round += 1;
            state = DebateState::Debating(round);
            debug!("Debate state: {}", state);
            info!("Debate round {}/{}", round, self.max_rounds);

            let snapshot = Arc::new(current);
            current = self
                .revise_round(&snapshot, round, producers, progress, cancellation)
                .await?;
            history.push(current.clone());

            let agreement = agreement_score(&current);
            progress.on_debate_round(round, self.max_rounds, agreement);
            debug!("Round {} agreement: {:.2}", round, agreement);

            if self
                .policy
                .consensus
                .is_consensus(&current, round, self.max_rounds)
            {
                info!("Consensus reached after {} rounds", round);
                break DebateState::Converged(round);
            }
            if round >= self.max_rounds {
                info!("Round budget exhausted after {} rounds", round);
                break DebateState::Exhausted(round);
            }
        };

        Ok(DebateOutcome {
            final_set: current,
            history,
            state,
        })
    }

    /// Revise every member of `snapshot` against its peers.
    async fn revise_round(
        &self,
        snapshot: &Arc<OpinionSet>,
        round: usize,
        producers: &ProducerRegistry,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<OpinionSet, PoolCancelled> {
        progress.on_phase_start(&Phase::Debate, snapshot.len());

        let specialties: Vec<_> = snapshot.specialties().collect();
        let tasks: Vec<_> = specialties
            .iter()
            .map(|&specialty| {
                let snapshot = Arc::clone(snapshot);
                let producer = producers.get(specialty);
                async move {
                    let Some(current) = snapshot.get(specialty).cloned() else {
                        return Opinion::error(specialty, "missing from snapshot").in_round(round);
                    };
                    match producer {
                        Some(producer) => {
                            let peers = snapshot.peers_of(specialty);
                            producer.revise(&current, &peers).await
                        }
                        // Nothing can revise it; carry it into the new round.
                        None => current.in_round(round),
                    }
                }
            })
            .collect();

        let results = self.pool.run_all(tasks, cancellation).await?;

        let revised: OpinionSet = specialties
            .into_iter()
            .zip(results)
            .map(|(specialty, result)| {
                let opinion = match result {
                    Ok(opinion) => opinion,
                    Err(e) => {
                        warn!("Revision task for {} failed: {}", specialty, e);
                        Opinion::error(specialty, format!("revision task failed: {}", e))
                            .in_round(round)
                    }
                };
                progress.on_task_complete(&Phase::Debate, Some(specialty), !opinion.is_error());
                opinion
            })
            .collect();

        Ok(revised)
    }
}
