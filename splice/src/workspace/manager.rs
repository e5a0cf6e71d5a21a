//! Workspace manager owning the local checkout used to compose batches

use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::git::{Git, GitError, MergeOutcome, SystemGit};

/// Error types for workspace operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to create workspace directory: {0}")]
    CreateFailed(#[source] std::io::Error),

    #[error("Failed to remove workspace directory: {0}")]
    RemoveFailed(#[source] std::io::Error),

    #[error("Git command failed: {0}")]
    Git(#[from] GitError),
}

/// Naming and identity used inside the workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Branch batches are built on
    #[serde(rename = "base-branch", default = "default_base_branch")]
    pub base_branch: String,

    /// Integration branch the candidates are merged into
    #[serde(rename = "batch-branch", default = "default_batch_branch")]
    pub batch_branch: String,

    /// Orphan branch checked out while resetting
    #[serde(rename = "scratch-branch", default = "default_scratch_branch")]
    pub scratch_branch: String,

    /// Committer name for merge commits
    #[serde(rename = "user-name", default = "default_user_name")]
    pub user_name: String,

    /// Committer email for merge commits
    #[serde(rename = "user-email", default = "default_user_email")]
    pub user_email: String,
}

fn default_base_branch() -> String {
    "master".to_string()
}

fn default_batch_branch() -> String {
    "batch".to_string()
}

fn default_scratch_branch() -> String {
    "blank".to_string()
}

fn default_user_name() -> String {
    "Splice".to_string()
}

fn default_user_email() -> String {
    "splice@localhost".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            batch_branch: default_batch_branch(),
            scratch_branch: default_scratch_branch(),
            user_name: default_user_name(),
            user_email: default_user_email(),
        }
    }
}

impl WorkspaceConfig {
    /// Create config batching onto `base_branch`
    pub fn with_base(base_branch: impl Into<String>) -> Self {
        Self {
            base_branch: base_branch.into(),
            ..Default::default()
        }
    }
}

/// Local branch a pull request head is fetched into
pub fn pr_branch(number: u64) -> String {
    format!("pr/{number}")
}

/// Exclusive owner of the batch-composition repository
///
/// Mutated in place every cycle and never shared. When created with
/// [`Workspace::create`] the directory is removed on [`Workspace::cleanup`]
/// or drop.
pub struct Workspace {
    git: Box<dyn Git>,
    config: WorkspaceConfig,
    dir: Option<TempDir>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("config", &self.config)
            .field("dir", &self.path())
            .finish()
    }
}

impl Workspace {
    /// Initialise a repository in a fresh temporary directory
    pub async fn create(config: WorkspaceConfig) -> Result<Self, WorkspaceError> {
        debug!(?config, "Workspace::create: called");
        let dir = tempfile::Builder::new()
            .prefix("splice_")
            .tempdir()
            .map_err(WorkspaceError::CreateFailed)?;

        let git = SystemGit::new(dir.path());
        let mut workspace = Self::with_git(Box::new(git), config);
        workspace.dir = Some(dir);

        // On failure the TempDir is dropped with the workspace
        workspace.init().await?;
        info!("Workspace created in {:?}", workspace.path());
        Ok(workspace)
    }

    /// Wrap an existing git capability without owning any directory
    pub fn with_git(git: Box<dyn Git>, config: WorkspaceConfig) -> Self {
        Self { git, config, dir: None }
    }

    /// Run `git init` and set the merge identity
    pub async fn init(&self) -> Result<(), WorkspaceError> {
        debug!("Workspace::init: called");
        self.git.init_repository().await?;
        self.git
            .set_identity(&self.config.user_name, &self.config.user_email)
            .await?;
        Ok(())
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn base_branch(&self) -> &str {
        &self.config.base_branch
    }

    /// Directory of the checkout, if this workspace owns one
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Discard local changes and untracked files and leave a history-less tree
    pub async fn reset(&mut self) -> Result<(), WorkspaceError> {
        debug!("Workspace::reset: called");
        self.git.reset_hard().await?;
        self.git.checkout_orphan(&self.config.scratch_branch).await?;
        self.git.reset_hard().await?;
        self.git.clean().await?;
        Ok(())
    }

    /// Fetch the base branch and the head of every candidate into local branches
    pub async fn fetch(&mut self, remote: &str, candidates: &[u64]) -> Result<(), WorkspaceError> {
        debug!(%remote, ?candidates, "Workspace::fetch: called");
        let base = &self.config.base_branch;
        let mut refspecs = Vec::with_capacity(candidates.len() + 1);
        refspecs.push(format!("{base}:{base}"));
        refspecs.extend(candidates.iter().map(|n| format!("pull/{n}/head:{}", pr_branch(*n))));
        self.git.fetch(remote, &refspecs).await?;
        Ok(())
    }

    /// Check out a fresh integration branch at the base branch
    pub async fn start_batch(&mut self) -> Result<(), WorkspaceError> {
        debug!("Workspace::start_batch: called");
        self.git
            .checkout_new_branch(&self.config.batch_branch, &self.config.base_branch)
            .await?;
        Ok(())
    }

    /// Merge a fetched candidate into the integration branch
    pub async fn merge_candidate(&mut self, number: u64) -> Result<MergeOutcome, WorkspaceError> {
        let outcome = self
            .git
            .merge(&pr_branch(number), &format!("merge #{number}"))
            .await?;
        Ok(outcome)
    }

    /// Abandon an in-progress merge, restoring the pre-merge branch state
    pub async fn abort_merge(&mut self) -> Result<(), WorkspaceError> {
        self.git.abort_merge().await?;
        Ok(())
    }

    pub async fn resolve_ref(&self, name: &str) -> Result<String, WorkspaceError> {
        Ok(self.git.resolve_ref(name).await?)
    }

    /// Delete the workspace directory
    pub fn cleanup(mut self) -> Result<(), WorkspaceError> {
        debug!("Workspace::cleanup: called");
        match self.dir.take() {
            Some(dir) => {
                let path = dir.path().to_path_buf();
                dir.close().map_err(WorkspaceError::RemoveFailed)?;
                info!("Removed workspace {:?}", path);
            }
            None => warn!("Workspace owns no directory, nothing to remove"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::ScriptedGit;

    fn workspace(git: &ScriptedGit) -> Workspace {
        Workspace::with_git(Box::new(git.clone()), WorkspaceConfig::default())
    }

    #[test]
    fn test_default_config() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.base_branch, "master");
        assert_eq!(config.batch_branch, "batch");
        assert_eq!(config.scratch_branch, "blank");
        assert_eq!(config.user_email, "splice@localhost");
    }

    #[test]
    fn test_pr_branch() {
        assert_eq!(pr_branch(101), "pr/101");
    }

    #[tokio::test]
    async fn test_init_sets_identity() {
        let git = ScriptedGit::new();
        workspace(&git).init().await.unwrap();
        assert_eq!(git.calls(), vec!["init", "identity Splice <splice@localhost>"]);
    }

    #[tokio::test]
    async fn test_reset_sequence() {
        let git = ScriptedGit::new();
        workspace(&git).reset().await.unwrap();
        assert_eq!(git.calls(), vec!["reset", "orphan blank", "reset", "clean"]);
    }

    #[tokio::test]
    async fn test_fetch_refspecs() {
        let git = ScriptedGit::new()
            .with_base("master", "b0")
            .with_pr(7, "h7", &["a"])
            .with_pr(3, "h3", &["b"]);
        let mut ws = workspace(&git);
        ws.fetch("origin", &[7, 3]).await.unwrap();

        assert_eq!(git.calls(), vec!["fetch origin master:master pull/7/head:pr/7 pull/3/head:pr/3"]);
        assert_eq!(ws.resolve_ref("pr/7").await.unwrap(), "h7");
        assert_eq!(ws.resolve_ref("master").await.unwrap(), "b0");
    }

    #[tokio::test]
    async fn test_fetch_missing_pr_fails() {
        let git = ScriptedGit::new().with_base("master", "b0");
        let result = workspace(&git).fetch("origin", &[9]).await;
        assert!(matches!(result, Err(WorkspaceError::Git(_))));
    }

    #[tokio::test]
    async fn test_resolve_unknown_ref() {
        let git = ScriptedGit::new();
        let result = workspace(&git).resolve_ref("pr/1").await;
        assert!(matches!(result, Err(WorkspaceError::Git(GitError::RefNotFound(_)))));
    }

    #[tokio::test]
    async fn test_cleanup_without_directory() {
        let git = ScriptedGit::new();
        assert!(workspace(&git).cleanup().is_ok());
    }

    #[tokio::test]
    async fn test_create_and_cleanup_removes_directory() {
        let ws = Workspace::create(WorkspaceConfig::default()).await.unwrap();
        let path = ws.path().unwrap().to_path_buf();
        assert!(path.join(".git").exists());
        assert!(
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("splice_"))
        );

        ws.cleanup().unwrap();
        assert!(!path.exists());
    }
}
