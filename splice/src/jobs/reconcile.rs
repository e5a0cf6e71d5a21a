//! Job reconciliation
//!
//! Pure filters over configured specs and backend records. A job counts as
//! already done for a batch only when a finished, successful batch run exists
//! whose refs signature is byte-for-byte the batch's canonical form, so any
//! change in composition (a different pull, a new head, a new order) makes
//! every required job run again.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{BatchDescriptor, JobRecord, JobSpec};

/// Batch runs that already passed against exactly `refs`
pub fn completed_jobs<'a>(jobs: &'a [JobRecord], refs: &BatchDescriptor) -> Vec<&'a JobRecord> {
    jobs.iter().filter(|job| job.passed_for(refs)).collect()
}

/// Specs that block a merge: always run and report a status
///
/// Manual and silent jobs never block a batch and are never launched here.
pub fn required_presubmits(specs: &[JobSpec]) -> Vec<&JobSpec> {
    specs.iter().filter(|spec| spec.is_required()).collect()
}

/// Required specs whose context has not yet passed for `refs`, in config order
pub fn needed_presubmits<'a>(specs: &'a [JobSpec], jobs: &[JobRecord], refs: &BatchDescriptor) -> Vec<&'a JobSpec> {
    let skippable: HashSet<&str> = completed_jobs(jobs, refs)
        .into_iter()
        .map(|job| job.context.as_str())
        .collect();

    let needed: Vec<&JobSpec> = required_presubmits(specs)
        .into_iter()
        .filter(|spec| !skippable.contains(spec.context.as_str()))
        .collect();
    debug!(
        required = specs.iter().filter(|s| s.is_required()).count(),
        skippable = skippable.len(),
        needed = needed.len(),
        "needed_presubmits: reconciled"
    );
    needed
}

/// Names of batch runs still in flight
pub fn running_batch_jobs(jobs: &[JobRecord]) -> Vec<&str> {
    jobs.iter()
        .filter(|job| job.is_batch() && !job.complete)
        .map(|job| job.name.as_str())
        .collect()
}
