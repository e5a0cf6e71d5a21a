//! Verification jobs
//!
//! - [`JobBackend`] - lists job runs and launches new ones
//! - [`reconcile`] - pure filters deciding which required jobs a batch still needs

mod backend;
mod error;
mod http;
pub mod reconcile;

pub use backend::JobBackend;
pub use error::BackendError;
pub use http::HttpJobBackend;
pub use reconcile::{completed_jobs, needed_presubmits, required_presubmits, running_batch_jobs};

#[cfg(test)]
pub use backend::mock;
