//! CLI definitions

use std::path::PathBuf;

use clap::Parser;

use crate::splicer::SpliceConfig;

/// Splice - batch composer for the merge queue
#[derive(Debug, Parser)]
#[command(
    name = "splice",
    about = "Merges queued pull requests into batches and launches their verification jobs",
    version
)]
pub struct Cli {
    /// Submit queue status URL
    #[arg(long, default_value = "http://submit-queue.k8s.io/github-e2e-queue")]
    pub submit_queue_endpoint: String,

    /// Remote git URL pull requests are fetched from
    #[arg(long, default_value = "https://github.com/kubernetes/kubernetes")]
    pub remote_url: String,

    /// Org name
    #[arg(long, default_value = "kubernetes")]
    pub org: String,

    /// Repo name
    #[arg(long, default_value = "kubernetes")]
    pub repo: String,

    /// Branch batches are built on
    #[arg(long, default_value = "master")]
    pub default_branch: String,

    /// Path to the job configuration file
    #[arg(long, default_value = "/etc/config/config")]
    pub config_path: PathBuf,

    /// Maximum batch size
    #[arg(long, default_value_t = 5)]
    pub batch_size: usize,

    /// Job backend base URL
    #[arg(long, default_value = "http://localhost:8080")]
    pub job_backend_url: String,

    /// Seconds between loop ticks
    #[arg(long, default_value_t = 60)]
    pub tick_interval_secs: u64,

    /// Ticks to wait after launching a batch
    #[arg(long, default_value_t = 5)]
    pub cooldown_ticks: u32,

    /// Output log in JSON format
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Loop parameters from the command line
    pub fn splice_config(&self) -> SpliceConfig {
        SpliceConfig {
            org: self.org.clone(),
            repo: self.repo.clone(),
            remote_url: self.remote_url.clone(),
            default_branch: self.default_branch.clone(),
            max_batch_size: self.batch_size,
            tick_interval_secs: self.tick_interval_secs,
            cooldown_ticks: self.cooldown_ticks,
        }
    }
}
