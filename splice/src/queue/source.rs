//! QueueSource trait definition

use async_trait::async_trait;

use super::QueueError;
use crate::domain::CandidatePr;

/// Something that can list the merge queue, in priority order
#[async_trait]
pub trait QueueSource: Send + Sync {
    async fn fetch_queue(&self) -> Result<Vec<CandidatePr>, QueueError>;
}
