//! Ephemeral integration workspace
//!
//! One local repository, reset and reused every cycle: the base branch and the
//! queued pull requests are fetched into it, merged one by one into a fresh
//! integration branch, and the surviving pulls are pinned into a
//! [`BatchDescriptor`](crate::domain::BatchDescriptor).

mod feasibility;
mod manager;
mod refs;

pub use feasibility::find_mergeable;
pub use manager::{Workspace, WorkspaceConfig, WorkspaceError};
pub use refs::resolve_batch_refs;
