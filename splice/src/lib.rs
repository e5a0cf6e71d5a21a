//! Splice - batch composer for a pull request merge queue
//!
//! Splice repeatedly takes the merge queue, merges as many queued pull
//! requests as it can into one integration branch, and launches the required
//! verification jobs for exactly that batch, skipping any job that already
//! passed against the identical batch.
//!
//! # Modules
//!
//! - [`workspace`] - the local checkout, merge feasibility and batch refs
//! - [`jobs`] - job backend client and reconciliation of needed jobs
//! - [`splicer`] - the tick-driven reconciliation loop
//! - [`queue`] - merge queue source
//! - [`git`] - version-control capability
//! - [`config`] - job configuration loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod git;
pub mod jobs;
pub mod queue;
pub mod splicer;
pub mod workspace;

// Re-export commonly used types
pub use config::{Config, ConfigAgent};
pub use domain::{BatchDescriptor, BatchJobRequest, CandidatePr, JobFilter, JobRecord, JobSpec, JobState, JobType, Pull};
pub use git::{Git, GitError, MergeOutcome, SystemGit};
pub use jobs::{BackendError, HttpJobBackend, JobBackend, completed_jobs, needed_presubmits, required_presubmits};
pub use queue::{HttpQueueSource, QueueError, QueueSource};
pub use splicer::{BatchLaunch, IntervalTicker, LoopState, Phase, SpliceConfig, Splicer, TickOutcome, Ticker};
pub use workspace::{Workspace, WorkspaceConfig, WorkspaceError, find_mergeable, resolve_batch_refs};
