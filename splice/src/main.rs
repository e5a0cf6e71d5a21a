//! Splice - batch composer
//!
//! Entry point: parses flags, sets up logging, acquires the workspace, the
//! job configuration and the job backend, then ticks until interrupted.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use splice::cli::Cli;
use splice::config::ConfigAgent;
use splice::domain::JobFilter;
use splice::jobs::{HttpJobBackend, JobBackend};
use splice::queue::HttpQueueSource;
use splice::splicer::{IntervalTicker, Splicer};
use splice::workspace::Workspace;

fn setup_logging(verbose: bool, json: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Logging initialized (verbose: {}, json: {})", verbose, json);
}

/// Stop signals the splicer shuts down on
#[cfg(unix)]
struct Shutdown {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Shutdown {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        debug!("Shutdown::install: called");
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn wait(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => warn!("SIGINT received"),
            _ = self.terminate.recv() => warn!("SIGTERM received"),
        }
    }
}

#[cfg(not(unix))]
struct Shutdown;

#[cfg(not(unix))]
impl Shutdown {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn wait(&mut self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.log_json);

    let config = cli.splice_config();
    config.validate().context("Invalid settings")?;

    // Must be in place before the workspace exists
    let mut shutdown = Shutdown::install().context("Failed to install signal handlers")?;

    let workspace = Workspace::create(config.workspace())
        .await
        .context("Could not make splicer workspace")?;

    let jobs = ConfigAgent::start(&cli.config_path).context("Could not start config agent")?;

    let backend = HttpJobBackend::new(&cli.job_backend_url).context("Error creating job backend client")?;
    backend
        .list_jobs(&JobFilter::batch())
        .await
        .context("Error reaching job backend")?;

    let queue = HttpQueueSource::new(&cli.submit_queue_endpoint).context("Error creating queue client")?;

    let mut ticker = IntervalTicker::new(config.tick_interval());
    let mut splicer = Splicer::new(config, workspace, Arc::new(queue), Arc::new(backend), jobs);

    tokio::select! {
        _ = splicer.run(&mut ticker) => {}
        _ = shutdown.wait() => info!("Shutdown requested"),
    }

    splicer
        .into_workspace()
        .cleanup()
        .context("Failed to remove workspace")?;
    Ok(())
}
