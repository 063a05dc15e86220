//! Repository config mutations via the git CLI
//!
//! The post-success side effects (push default, remote HEAD) are plain
//! `git config` / `git symbolic-ref` calls. They are short-lived local
//! operations, so they run to completion here instead of going through
//! the async runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// The config key naming the remote `git push` defaults to
pub const PUSH_DEFAULT_KEY: &str = "remote.pushDefault";

/// Key-value access to a repository's git configuration
pub struct GitConfig {
    repo_dir: PathBuf,
}

impl GitConfig {
    /// Config accessor for the repository at `repo_dir`
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// The repository this accessor operates on
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    async fn git(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }

    /// Read a config key; `None` when the key is unset
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let output = self.git(&["config", "--get", key]).await?;

        if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Some(value))
        } else if output.status.code() == Some(1) {
            // Exit 1 means the key is not set
            Ok(None)
        } else {
            Err(GitError::ConfigKey {
                key: key.to_string(),
                action: "read".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    /// Write a config key
    #[instrument(skip(self))]
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let output = self.git(&["config", key, value]).await?;

        if output.status.success() {
            debug!("set {} = {}", key, value);
            Ok(())
        } else {
            Err(GitError::ConfigKey {
                key: key.to_string(),
                action: "set".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    /// Remove a config key; unsetting an absent key is a no-op
    #[instrument(skip(self))]
    pub async fn unset(&self, key: &str) -> Result<()> {
        let output = self.git(&["config", "--unset", key]).await?;

        // Exit 5 means the key was not set to begin with
        if output.status.success() || output.status.code() == Some(5) {
            Ok(())
        } else {
            Err(GitError::ConfigKey {
                key: key.to_string(),
                action: "unset".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    /// Delete a symbolic ref; deleting an absent ref is a no-op
    #[instrument(skip(self))]
    pub async fn delete_symbolic_ref(&self, name: &str) -> Result<()> {
        // `-q` exits nonzero without complaint when the ref is absent or
        // not symbolic, so absence never depends on parsing stderr text.
        let lookup = self.git(&["symbolic-ref", "-q", name]).await?;
        if !lookup.status.success() {
            return Ok(());
        }

        let output = self.git(&["symbolic-ref", "--delete", name]).await?;

        if output.status.success() {
            debug!("deleted symbolic ref {}", name);
            Ok(())
        } else {
            Err(GitError::ConfigKey {
                key: name.to_string(),
                action: "delete".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    /// Point `refs/remotes/<remote>/HEAD` at whatever the remote reports
    #[instrument(skip(self))]
    pub async fn set_remote_head(&self, remote: &str) -> Result<()> {
        let output = self.git(&["remote", "set-head", remote, "--auto"]).await?;

        if output.status.success() {
            debug!("updated HEAD for remote {}", remote);
            Ok(())
        } else {
            Err(GitError::ConfigKey {
                key: format!("refs/remotes/{remote}/HEAD"),
                action: "update".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }
}
