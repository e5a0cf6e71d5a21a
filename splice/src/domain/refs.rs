//! Batch descriptors
//!
//! A [`BatchDescriptor`] tells a verification job exactly which commits to
//! check out: the base branch at a fixed SHA plus every pull request head, in
//! queue order. Its canonical string form is the key used to recognise jobs
//! that already ran against the identical batch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One pull request inside a batch, pinned to the head commit that was fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub number: u64,
    pub sha: String,
}

/// The exact composition of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDescriptor {
    pub org: String,
    pub repo: String,
    pub base_ref: String,
    pub base_sha: String,
    /// Pulls in queue order; never sorted
    pub pulls: Vec<Pull>,
}

impl BatchDescriptor {
    pub fn new(
        org: impl Into<String>,
        repo: impl Into<String>,
        base_ref: impl Into<String>,
        base_sha: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            base_ref: base_ref.into(),
            base_sha: base_sha.into(),
            pulls: Vec::new(),
        }
    }

    /// Append a pull, keeping insertion order
    pub fn with_pull(mut self, number: u64, sha: impl Into<String>) -> Self {
        self.pulls.push(Pull {
            number,
            sha: sha.into(),
        });
        self
    }

    /// Canonical form, e.g. `kubernetes/kubernetes@master:abc123,101:def456,103:0a1b2c`
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// Pull request numbers in batch order
    pub fn numbers(&self) -> Vec<u64> {
        self.pulls.iter().map(|p| p.number).collect()
    }
}

impl fmt::Display for BatchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}:{}", self.org, self.repo, self.base_ref, self.base_sha)?;
        for pull in &self.pulls {
            write!(f, ",{}:{}", pull.number, pull.sha)?;
        }
        Ok(())
    }
}
