//! Loop state threaded through every tick

use crate::domain::BatchDescriptor;

/// Where the loop is within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FetchingQueue,
    ComposingBatch,
    Reconciling,
    Submitting,
    /// A batch was launched; new batches wait for the cooldown to run out
    Cooldown,
}

/// Everything the loop carries from one tick to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopState {
    pub phase: Phase,

    /// Ticks left before a new batch may be composed
    pub cooldown: u32,
}

/// A batch whose jobs were submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLaunch {
    pub refs: BatchDescriptor,

    /// Jobs the backend accepted
    pub submitted: Vec<String>,

    /// Jobs the backend rejected
    pub failed: Vec<String>,

    /// Required contexts already passed for this exact batch
    pub skipped: Vec<String>,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Listing jobs failed; nothing else was attempted
    JobsUnavailable,
    /// Batch jobs still running; holds their names
    WaitingOnJobs(Vec<String>),
    CoolingDown { remaining: u32 },
    QueueUnavailable,
    QueueEmpty,
    /// The workspace failed while composing the batch
    ComposeFailed,
    /// Too few pulls merge together to be worth a batch
    NotWorthBatching { mergeable: usize },
    Launched(BatchLaunch),
}

impl TickOutcome {
    pub fn is_launch(&self) -> bool {
        matches!(self, Self::Launched(_))
    }
}
