//! Git trait definition

use async_trait::async_trait;

use super::GitError;

/// Result of attempting a merge into the checked-out branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merge commit was created
    Merged,
    /// The merge stopped; the tree is mid-merge until aborted
    Conflict { output: String },
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged)
    }
}

/// Operations the workspace needs from a local repository
///
/// Every call either completes or fails as a unit. Output is for diagnostics only.
#[async_trait]
pub trait Git: Send + Sync {
    async fn init_repository(&self) -> Result<(), GitError>;

    /// Set the committer identity used for merge commits
    async fn set_identity(&self, name: &str, email: &str) -> Result<(), GitError>;

    async fn reset_hard(&self) -> Result<(), GitError>;

    /// Switch to a new branch with no history
    async fn checkout_orphan(&self, name: &str) -> Result<(), GitError>;

    /// Remove untracked and ignored files
    async fn clean(&self) -> Result<(), GitError>;

    /// Force-fetch `refspecs` (`src:dst`) from `remote`
    async fn fetch(&self, remote: &str, refspecs: &[String]) -> Result<(), GitError>;

    /// Create or reset branch `name` at `from` and check it out
    async fn checkout_new_branch(&self, name: &str, from: &str) -> Result<(), GitError>;

    /// Non-fast-forward merge of `branch` into the current branch
    async fn merge(&self, branch: &str, message: &str) -> Result<MergeOutcome, GitError>;

    async fn abort_merge(&self) -> Result<(), GitError>;

    /// Commit hash `name` currently points to
    async fn resolve_ref(&self, name: &str) -> Result<String, GitError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Repo {
        calls: Vec<String>,
        remote_base: Option<(String, String)>,
        remote_heads: HashMap<u64, String>,
        touches: HashMap<u64, Vec<String>>,
        branches: HashMap<String, String>,
        current: Option<String>,
        batch_paths: HashSet<String>,
        merging: bool,
        fail_on: Option<String>,
        merge_commits: u64,
    }

    /// Scripted git for unit tests
    ///
    /// Each pull request touches a set of paths; merging it conflicts when one
    /// of those paths was already touched by a pull merged into the current
    /// branch. Clones share state, so a test can keep a handle for inspection.
    #[derive(Clone, Default)]
    pub struct ScriptedGit {
        repo: Arc<Mutex<Repo>>,
    }

    impl ScriptedGit {
        pub fn new() -> Self {
            Self::default()
        }

        /// Remote base branch `name` at `sha`
        pub fn with_base(self, name: &str, sha: &str) -> Self {
            self.repo.lock().unwrap().remote_base = Some((name.to_string(), sha.to_string()));
            self
        }

        /// Remote pull request `number` with head `sha` touching `paths`
        pub fn with_pr(self, number: u64, sha: &str, paths: &[&str]) -> Self {
            {
                let mut repo = self.repo.lock().unwrap();
                repo.remote_heads.insert(number, sha.to_string());
                repo.touches
                    .insert(number, paths.iter().map(|p| p.to_string()).collect());
            }
            self
        }

        /// Make every call to operation `op` fail
        pub fn failing_on(self, op: &str) -> Self {
            self.set_failing_on(Some(op));
            self
        }

        pub fn set_failing_on(&self, op: Option<&str>) {
            self.repo.lock().unwrap().fail_on = op.map(str::to_string);
        }

        /// Move the remote head of pull request `number`
        pub fn push_pr(&self, number: u64, sha: &str) {
            self.repo.lock().unwrap().remote_heads.insert(number, sha.to_string());
        }

        pub fn calls(&self) -> Vec<String> {
            self.repo.lock().unwrap().calls.clone()
        }

        pub fn branch(&self, name: &str) -> Option<String> {
            self.repo.lock().unwrap().branches.get(name).cloned()
        }

        pub fn is_merging(&self) -> bool {
            self.repo.lock().unwrap().merging
        }

        fn record(&self, op: &str, detail: String) -> Result<std::sync::MutexGuard<'_, Repo>, GitError> {
            let mut repo = self.repo.lock().unwrap();
            repo.calls.push(if detail.is_empty() {
                op.to_string()
            } else {
                format!("{op} {detail}")
            });
            if repo.fail_on.as_deref() == Some(op) {
                return Err(failed(op, "injected failure"));
            }
            Ok(repo)
        }
    }

    fn failed(command: &str, output: &str) -> GitError {
        GitError::CommandFailed {
            command: command.to_string(),
            code: Some(1),
            output: output.to_string(),
        }
    }

    #[async_trait]
    impl Git for ScriptedGit {
        async fn init_repository(&self) -> Result<(), GitError> {
            let _repo = self.record("init", String::new())?;
            Ok(())
        }

        async fn set_identity(&self, name: &str, email: &str) -> Result<(), GitError> {
            let _repo = self.record("identity", format!("{name} <{email}>"))?;
            Ok(())
        }

        async fn reset_hard(&self) -> Result<(), GitError> {
            let mut repo = self.record("reset", String::new())?;
            repo.merging = false;
            Ok(())
        }

        async fn checkout_orphan(&self, name: &str) -> Result<(), GitError> {
            let mut repo = self.record("orphan", name.to_string())?;
            repo.current = Some(name.to_string());
            repo.batch_paths.clear();
            Ok(())
        }

        async fn clean(&self) -> Result<(), GitError> {
            let _repo = self.record("clean", String::new())?;
            Ok(())
        }

        async fn fetch(&self, remote: &str, refspecs: &[String]) -> Result<(), GitError> {
            let mut repo = self.record("fetch", format!("{remote} {}", refspecs.join(" ")))?;
            for refspec in refspecs {
                let (src, dst) = refspec
                    .split_once(':')
                    .ok_or_else(|| failed("fetch", &format!("invalid refspec {refspec}")))?;
                let sha = match src.strip_prefix("pull/").and_then(|s| s.strip_suffix("/head")) {
                    Some(number) => number
                        .parse::<u64>()
                        .ok()
                        .and_then(|n| repo.remote_heads.get(&n).cloned()),
                    None => repo
                        .remote_base
                        .as_ref()
                        .filter(|(name, _)| name == src)
                        .map(|(_, sha)| sha.clone()),
                };
                let sha = sha.ok_or_else(|| failed("fetch", &format!("couldn't find remote ref {src}")))?;
                repo.branches.insert(dst.to_string(), sha);
            }
            Ok(())
        }

        async fn checkout_new_branch(&self, name: &str, from: &str) -> Result<(), GitError> {
            let mut repo = self.record("checkout", format!("{name} {from}"))?;
            let sha = repo
                .branches
                .get(from)
                .cloned()
                .ok_or_else(|| failed("checkout", &format!("'{from}' is not a commit")))?;
            repo.branches.insert(name.to_string(), sha);
            repo.current = Some(name.to_string());
            repo.batch_paths.clear();
            Ok(())
        }

        async fn merge(&self, branch: &str, message: &str) -> Result<MergeOutcome, GitError> {
            let mut repo = self.record("merge", format!("{branch} ({message})"))?;
            let number = branch.strip_prefix("pr/").and_then(|n| n.parse::<u64>().ok());
            let paths = match number {
                Some(n) if repo.branches.contains_key(branch) => repo.touches.get(&n).cloned().unwrap_or_default(),
                _ => {
                    return Ok(MergeOutcome::Conflict {
                        output: format!("merge: {branch} - not something we can merge"),
                    });
                }
            };
            if paths.iter().any(|p| repo.batch_paths.contains(p)) {
                repo.merging = true;
                return Ok(MergeOutcome::Conflict {
                    output: format!("CONFLICT (content): Merge conflict in {}", paths.join(", ")),
                });
            }
            repo.batch_paths.extend(paths);
            repo.merge_commits += 1;
            let commit = format!("merge-commit-{}", repo.merge_commits);
            if let Some(current) = repo.current.clone() {
                repo.branches.insert(current, commit);
            }
            Ok(MergeOutcome::Merged)
        }

        async fn abort_merge(&self) -> Result<(), GitError> {
            let mut repo = self.record("abort", String::new())?;
            if !repo.merging {
                return Err(failed("merge --abort", "fatal: There is no merge to abort (MERGE_HEAD missing)."));
            }
            repo.merging = false;
            Ok(())
        }

        async fn resolve_ref(&self, name: &str) -> Result<String, GitError> {
            let repo = self.record("rev-parse", name.to_string())?;
            repo.branches
                .get(name)
                .cloned()
                .ok_or_else(|| GitError::RefNotFound(name.to_string()))
        }
    }
}
