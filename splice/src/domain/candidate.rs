//! Merge queue entries

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pull request waiting in the merge queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePr {
    /// Pull request number
    #[serde(rename = "Number")]
    pub number: u64,

    /// Branch the pull request targets; empty when the queue did not say
    #[serde(rename = "BaseRef", default)]
    pub base_ref: String,
}

impl CandidatePr {
    pub fn new(number: u64, base_ref: impl Into<String>) -> Self {
        Self {
            number,
            base_ref: base_ref.into(),
        }
    }

    /// Whether this candidate may be batched against `default_branch`
    pub fn targets(&self, default_branch: &str) -> bool {
        self.base_ref.is_empty() || self.base_ref == default_branch
    }
}

/// Keep the numbers of candidates targeting the default branch, in queue order
///
/// A pull listed more than once keeps only its first position.
pub fn eligible_numbers(candidates: &[CandidatePr], default_branch: &str) -> Vec<u64> {
    let mut seen = HashSet::new();
    let eligible: Vec<u64> = candidates
        .iter()
        .filter(|c| c.targets(default_branch))
        .map(|c| c.number)
        .filter(|n| seen.insert(*n))
        .collect();
    debug!(
        total = candidates.len(),
        eligible = eligible.len(),
        "eligible_numbers: filtered queue"
    );
    eligible
}
