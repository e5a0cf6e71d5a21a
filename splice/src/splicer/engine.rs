//! The reconciliation loop itself

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{BatchLaunch, LoopState, Phase, SpliceConfig, TickOutcome, Ticker};
use crate::config::ConfigAgent;
use crate::domain::{JobFilter, eligible_numbers};
use crate::jobs::{JobBackend, needed_presubmits, required_presubmits, running_batch_jobs};
use crate::queue::QueueSource;
use crate::workspace::{Workspace, find_mergeable, resolve_batch_refs};

/// Keep the first `max` pulls, which are the ones highest in the queue
pub fn trim_batch(mut prs: Vec<u64>, max: usize) -> Vec<u64> {
    prs.truncate(max);
    prs
}

/// Drives batch composition on every tick
///
/// Strictly sequential: one tick runs to completion before the next begins,
/// and the workspace is only ever touched from here.
pub struct Splicer {
    config: SpliceConfig,
    workspace: Workspace,
    queue: Arc<dyn QueueSource>,
    backend: Arc<dyn JobBackend>,
    jobs: ConfigAgent,
    state: LoopState,
}

impl Splicer {
    pub fn new(
        config: SpliceConfig,
        workspace: Workspace,
        queue: Arc<dyn QueueSource>,
        backend: Arc<dyn JobBackend>,
        jobs: ConfigAgent,
    ) -> Self {
        debug!(?config, "Splicer::new: called");
        Self {
            config,
            workspace,
            queue,
            backend,
            jobs,
            state: LoopState::default(),
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn config(&self) -> &SpliceConfig {
        &self.config
    }

    /// Give back the workspace, e.g. to remove it on shutdown
    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Tick until `ticker` stops
    pub async fn run(&mut self, ticker: &mut dyn Ticker) {
        info!(
            repo = %self.config.full_name(),
            interval_secs = self.config.tick_interval_secs,
            "Splicer started"
        );
        while ticker.tick().await {
            let outcome = self.tick().await;
            debug!(?outcome, phase = ?self.state.phase, "Splicer::run: tick done");
        }
        info!("Splicer stopped");
    }

    /// Run one full cycle
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self.cycle().await;
        self.state.phase = if self.state.cooldown > 0 {
            Phase::Cooldown
        } else {
            Phase::Idle
        };
        outcome
    }

    async fn cycle(&mut self) -> TickOutcome {
        if self.jobs.refresh() {
            info!("Job configuration reloaded");
        }

        // Only one batch may be in flight at a time
        let current_jobs = match self.backend.list_jobs(&JobFilter::batch()).await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!(error = %e, "Error listing batch jobs");
                return TickOutcome::JobsUnavailable;
            }
        };
        let running: Vec<String> = running_batch_jobs(&current_jobs)
            .into_iter()
            .map(str::to_string)
            .collect();
        if !running.is_empty() {
            info!("Waiting on {} jobs: {:?}", running.len(), running);
            return TickOutcome::WaitingOnJobs(running);
        }

        // Gives the merge authority time to act on the last batch
        if self.state.cooldown > 0 {
            self.state.cooldown -= 1;
            debug!(remaining = self.state.cooldown, "Splicer::cycle: cooling down");
            return TickOutcome::CoolingDown {
                remaining: self.state.cooldown,
            };
        }

        self.state.phase = Phase::FetchingQueue;
        let queue = match self.queue.fetch_queue().await {
            Ok(queue) => eligible_numbers(&queue, &self.config.default_branch),
            Err(e) => {
                warn!(error = %e, "Error getting queued PRs. Is the submit queue down?");
                return TickOutcome::QueueUnavailable;
            }
        };
        if queue.is_empty() {
            debug!("Splicer::cycle: queue empty");
            return TickOutcome::QueueEmpty;
        }
        info!("PRs in queue: {:?}", queue);

        self.state.phase = Phase::ComposingBatch;
        let mergeable = match find_mergeable(&mut self.workspace, &self.config.remote_url, &queue).await {
            Ok(prs) => prs,
            Err(e) => {
                error!(error = %e, "Error computing mergeable PRs");
                return TickOutcome::ComposeFailed;
            }
        };
        if mergeable.len() <= 1 {
            debug!(?mergeable, "Splicer::cycle: not enough mergeable PRs for a batch");
            return TickOutcome::NotWorthBatching {
                mergeable: mergeable.len(),
            };
        }

        let batch = trim_batch(mergeable, self.config.max_batch_size);
        info!("Starting a batch for the following PRs: {:?}", batch);
        let refs = match resolve_batch_refs(&self.workspace, &self.config.org, &self.config.repo, &batch).await {
            Ok(refs) => refs,
            Err(e) => {
                error!(error = %e, "Error resolving batch refs");
                return TickOutcome::ComposeFailed;
            }
        };

        self.state.phase = Phase::Reconciling;
        let presubmits = self.jobs.config().presubmits_for(&self.config.org, &self.config.repo);
        let needed = needed_presubmits(presubmits, &current_jobs, &refs);
        let skipped: Vec<String> = required_presubmits(presubmits)
            .into_iter()
            .filter(|spec| !needed.iter().any(|n| n.context == spec.context))
            .map(|spec| spec.context.clone())
            .collect();
        if !skipped.is_empty() {
            info!(refs = %refs, "Already passed for this batch: {:?}", skipped);
        }

        self.state.phase = Phase::Submitting;
        let mut submitted = Vec::new();
        let mut failed = Vec::new();
        for spec in needed {
            match self.backend.create_job(spec, &refs).await {
                Ok(_) => {
                    info!(job = %spec.name, context = %spec.context, "Started batch job");
                    submitted.push(spec.name.clone());
                }
                Err(e) => {
                    error!(job = %spec.name, error = %e, "Error starting batch job");
                    failed.push(spec.name.clone());
                }
            }
        }

        self.state.cooldown = self.config.cooldown_ticks;
        TickOutcome::Launched(BatchLaunch {
            refs,
            submitted,
            failed,
            skipped,
        })
    }
}
