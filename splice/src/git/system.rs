//! Git implementation backed by the `git` binary

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{Git, GitError, MergeOutcome};

/// Runs `git -C <dir> ...` for every operation
#[derive(Debug, Clone)]
pub struct SystemGit {
    dir: PathBuf,
}

impl SystemGit {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(?dir, "SystemGit::new: called");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run git and return its combined stdout and stderr
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        debug!("+ {}", command);

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if !text.is_empty() {
            debug!("{}", text.trim_end());
        }

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                code: output.status.code(),
                output: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Git for SystemGit {
    async fn init_repository(&self) -> Result<(), GitError> {
        self.run(&["init"]).await?;
        Ok(())
    }

    async fn set_identity(&self, name: &str, email: &str) -> Result<(), GitError> {
        self.run(&["config", "--local", "user.name", name]).await?;
        self.run(&["config", "--local", "user.email", email]).await?;
        Ok(())
    }

    async fn reset_hard(&self) -> Result<(), GitError> {
        self.run(&["reset", "--hard"]).await?;
        Ok(())
    }

    async fn checkout_orphan(&self, name: &str) -> Result<(), GitError> {
        self.run(&["checkout", "--orphan", name]).await?;
        Ok(())
    }

    async fn clean(&self) -> Result<(), GitError> {
        self.run(&["clean", "-fdx"]).await?;
        Ok(())
    }

    async fn fetch(&self, remote: &str, refspecs: &[String]) -> Result<(), GitError> {
        let mut args = vec!["fetch", "-f", remote];
        args.extend(refspecs.iter().map(String::as_str));
        self.run(&args).await?;
        Ok(())
    }

    async fn checkout_new_branch(&self, name: &str, from: &str) -> Result<(), GitError> {
        self.run(&["checkout", "-B", name, from]).await?;
        Ok(())
    }

    async fn merge(&self, branch: &str, message: &str) -> Result<MergeOutcome, GitError> {
        match self.run(&["merge", "--no-ff", "--no-stat", "-m", message, branch]).await {
            Ok(_) => Ok(MergeOutcome::Merged),
            Err(GitError::CommandFailed { output, .. }) => Ok(MergeOutcome::Conflict { output }),
            Err(e) => Err(e),
        }
    }

    async fn abort_merge(&self) -> Result<(), GitError> {
        self.run(&["merge", "--abort"]).await?;
        Ok(())
    }

    async fn resolve_ref(&self, name: &str) -> Result<String, GitError> {
        let spec = format!("{name}^{{commit}}");
        match self.run(&["rev-parse", "--verify", "--quiet", &spec]).await {
            Ok(output) => Ok(output.trim().to_string()),
            Err(GitError::CommandFailed { .. }) => Err(GitError::RefNotFound(name.to_string())),
            Err(e) => Err(e),
        }
    }
}
