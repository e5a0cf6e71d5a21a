//! JobBackend trait definition

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{BatchDescriptor, JobFilter, JobRecord, JobSpec};

/// The system that runs verification jobs
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// List known job runs matching `filter`
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, BackendError>;

    /// Launch a batch run of `spec` against `refs`
    async fn create_job(&self, spec: &JobSpec, refs: &BatchDescriptor) -> Result<JobRecord, BackendError>;
}
