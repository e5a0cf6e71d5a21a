//! Loop configuration

use std::time::Duration;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};

use crate::workspace::WorkspaceConfig;

/// Parameters of the reconciliation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpliceConfig {
    /// Organisation owning the repository
    pub org: String,

    /// Repository name
    pub repo: String,

    /// Git URL pull requests are fetched from
    #[serde(rename = "remote-url")]
    pub remote_url: String,

    /// Branch batches target; queue entries for other branches are ignored
    #[serde(rename = "default-branch", default = "default_branch")]
    pub default_branch: String,

    /// Largest number of pulls in one batch
    #[serde(rename = "max-batch-size", default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Seconds between ticks
    #[serde(rename = "tick-interval-secs", default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Ticks to stay idle after launching a batch
    #[serde(rename = "cooldown-ticks", default = "default_cooldown_ticks")]
    pub cooldown_ticks: u32,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_max_batch_size() -> usize {
    5
}

fn default_tick_interval_secs() -> u64 {
    60
}

fn default_cooldown_ticks() -> u32 {
    5
}

impl SpliceConfig {
    pub fn new(org: impl Into<String>, repo: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            remote_url: remote_url.into(),
            default_branch: default_branch(),
            max_batch_size: default_max_batch_size(),
            tick_interval_secs: default_tick_interval_secs(),
            cooldown_ticks: default_cooldown_ticks(),
        }
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.org.is_empty() || self.repo.is_empty() {
            return Err(eyre!("org and repo must both be set"));
        }
        if self.remote_url.is_empty() {
            return Err(eyre!("remote URL must be set"));
        }
        if self.default_branch.is_empty() {
            return Err(eyre!("default branch must be set"));
        }
        if self.max_batch_size < 2 {
            return Err(eyre!(
                "batch size must be at least 2, got {}; single pulls are never batched",
                self.max_batch_size
            ));
        }
        if self.tick_interval_secs == 0 {
            return Err(eyre!("tick interval must be positive"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// `org/repo`, the key jobs are configured under
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Workspace settings batching onto the default branch
    pub fn workspace(&self) -> WorkspaceConfig {
        WorkspaceConfig::with_base(&self.default_branch)
    }
}
