//! Domain types shared by the batch composer
//!
//! - [`CandidatePr`] - an entry of the external merge queue
//! - [`BatchDescriptor`] - the exact base and pull commits composing a batch
//! - [`JobSpec`] / [`JobRecord`] - configured verification jobs and their runs

mod candidate;
mod job;
mod refs;

pub use candidate::{CandidatePr, eligible_numbers};
pub use job::{BatchJobRequest, JobFilter, JobRecord, JobSpec, JobState, JobType};
pub use refs::{BatchDescriptor, Pull};
