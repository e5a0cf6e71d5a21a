//! Verification job configuration and job backend records

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BatchDescriptor;

/// A configured verification job for a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Job name as known to the job backend
    pub name: String,

    /// Status context the job reports under
    pub context: String,

    /// Runs on every change without being requested
    #[serde(rename = "always-run", default)]
    pub always_run: bool,

    /// Runs silently, never reporting a status
    #[serde(rename = "skip-report", default)]
    pub skip_report: bool,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            always_run: true,
            skip_report: false,
        }
    }

    /// Required jobs run unprompted and report a status, so they block merges
    pub fn is_required(&self) -> bool {
        self.always_run && !self.skip_report
    }
}

/// Kind of a job known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Presubmit,
    Postsubmit,
    Periodic,
    Batch,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presubmit => write!(f, "presubmit"),
            Self::Postsubmit => write!(f, "postsubmit"),
            Self::Periodic => write!(f, "periodic"),
            Self::Batch => write!(f, "batch"),
        }
    }
}

/// Last reported state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Triggered,
    Pending,
    Success,
    Failure,
    Aborted,
    Error,
}

/// A job as reported by the job backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job name
    #[serde(rename = "job")]
    pub name: String,

    #[serde(rename = "type")]
    pub job_type: JobType,

    pub context: String,

    /// Canonical form of the batch the job ran against; empty for non-batch jobs
    #[serde(default)]
    pub refs_signature: String,

    pub complete: bool,

    pub state: JobState,
}

impl JobRecord {
    pub fn is_batch(&self) -> bool {
        self.job_type == JobType::Batch
    }

    /// Whether this is a finished, successful batch run of exactly `refs`
    pub fn passed_for(&self, refs: &BatchDescriptor) -> bool {
        self.is_batch() && self.complete && self.state == JobState::Success && self.refs_signature == refs.signature()
    }
}

/// Selects which jobs the backend lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub job_type: Option<JobType>,
}

impl JobFilter {
    pub fn batch() -> Self {
        Self {
            job_type: Some(JobType::Batch),
        }
    }
}

/// Request body for launching a batch run of a configured job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJobRequest {
    pub job: String,

    #[serde(rename = "type")]
    pub job_type: JobType,

    pub context: String,

    pub refs: BatchDescriptor,

    pub refs_signature: String,
}

impl BatchJobRequest {
    pub fn new(spec: &JobSpec, refs: &BatchDescriptor) -> Self {
        Self {
            job: spec.name.clone(),
            job_type: JobType::Batch,
            context: spec.context.clone(),
            refs: refs.clone(),
            refs_signature: refs.signature(),
        }
    }
}
