//! Reconciliation loop
//!
//! On every tick the [`Splicer`] waits out running batch jobs and the
//! post-launch cooldown, then composes a batch from the merge queue, works
//! out which required jobs still need to run for it, and launches them.

mod config;
mod engine;
mod state;
mod ticker;

pub use config::SpliceConfig;
pub use engine::{Splicer, trim_batch};
pub use state::{BatchLaunch, LoopState, Phase, TickOutcome};
pub use ticker::{IntervalTicker, Ticker};

#[cfg(test)]
pub use ticker::mock;
