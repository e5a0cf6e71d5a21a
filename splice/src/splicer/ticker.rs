//! Tick sources driving the loop

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Paces the reconciliation loop
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick; `false` means no more ticks will come
    async fn tick(&mut self) -> bool;
}

/// Fixed-period wall-clock ticker
///
/// The first tick arrives one full period after creation.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}
