//! Merge feasibility: which queued pulls merge cleanly together
//!
//! Greedy and order-sensitive. Candidates are merged in queue order into a
//! fresh integration branch; a conflicting candidate is aborted and skipped,
//! and later candidates are tried against the tree built so far. There is no
//! backtracking, so a pull that merges cleanly on its own can still be
//! excluded by an earlier accepted pull.

use tracing::{debug, info};

use super::{Workspace, WorkspaceError};
use crate::git::MergeOutcome;

/// Fetch `candidates` from `remote` and return the order-preserving subset
/// that merges cleanly, one on top of the other
///
/// The workspace is reset first, so a failure in a previous attempt never
/// leaks into this one. Any git failure other than a merge conflict aborts
/// the whole attempt.
pub async fn find_mergeable(
    workspace: &mut Workspace,
    remote: &str,
    candidates: &[u64],
) -> Result<Vec<u64>, WorkspaceError> {
    debug!(%remote, ?candidates, "find_mergeable: called");
    workspace.reset().await?;
    workspace.fetch(remote, candidates).await?;
    workspace.start_batch().await?;

    let mut accepted = Vec::with_capacity(candidates.len());
    for &pr in candidates {
        match workspace.merge_candidate(pr).await? {
            MergeOutcome::Merged => {
                debug!(pr, "find_mergeable: merged");
                accepted.push(pr);
            }
            MergeOutcome::Conflict { output } => {
                info!(pr, "PR #{} does not merge cleanly, skipping", pr);
                debug!(pr, %output, "find_mergeable: conflict output");
                workspace.abort_merge().await?;
            }
        }
    }

    debug!(?accepted, "find_mergeable: done");
    Ok(accepted)
}
