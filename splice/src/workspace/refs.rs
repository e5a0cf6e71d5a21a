//! Batch reference resolution

use tracing::debug;

use super::manager::pr_branch;
use super::{Workspace, WorkspaceError};
use crate::domain::BatchDescriptor;

/// Pin the base branch and every accepted pull to concrete commits
///
/// Pulls resolve to the head commit that was fetched, never to the local
/// merge commits; the verification job redoes the merge itself. Any ref that
/// cannot be resolved fails the whole descriptor.
pub async fn resolve_batch_refs(
    workspace: &Workspace,
    org: &str,
    repo: &str,
    prs: &[u64],
) -> Result<BatchDescriptor, WorkspaceError> {
    debug!(%org, %repo, ?prs, "resolve_batch_refs: called");
    let base = workspace.base_branch();
    let base_sha = workspace.resolve_ref(base).await?;

    let mut refs = BatchDescriptor::new(org, repo, base, base_sha);
    for &pr in prs {
        let sha = workspace.resolve_ref(&pr_branch(pr)).await?;
        refs = refs.with_pull(pr, sha);
    }
    Ok(refs)
}
