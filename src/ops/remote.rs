//! Remote management: add, rename, remove, set-url, prune
//!
//! Precondition checks (name validity, existence) run synchronously and
//! abort before any process is spawned.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::{GitError, Result};
use crate::git::{GitBackend, GitConfig, PUSH_DEFAULT_KEY};
use crate::runner::Invocation;

use super::Courier;

/// Check a candidate remote name the way git would reject it
fn validate_remote_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('-')
        || name.contains(char::is_whitespace)
        || name.contains('/');
    if invalid {
        Err(GitError::InvalidRemoteName(name.to_string()).into())
    } else {
        Ok(())
    }
}

impl Courier {
    /// Add a remote; optionally fetch it right away
    #[instrument(skip(self))]
    pub async fn remote_add(
        &self,
        repo: &Path,
        name: &str,
        url: &str,
        fetch_after: bool,
    ) -> Result<()> {
        validate_remote_name(name)?;
        let backend = GitBackend::discover(repo)?;
        if backend.remote_exists(name) {
            return Err(GitError::RemoteExists(name.to_string()).into());
        }

        // Per-action switches must follow the action word: git rejects
        // `remote -f add`, so `-f` goes after `add`.
        let mut invocation = Invocation::new("remote").operand("add");
        if fetch_after {
            invocation = invocation.operand("-f");
        }
        invocation = invocation.operand(name).operand(url);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;
        info!("Added remote {} ({})", name, url);

        // Seed the push default when none is configured yet.
        let git_config = GitConfig::new(backend.path());
        if git_config.get(PUSH_DEFAULT_KEY).await?.is_none() {
            let question = format!("Set {PUSH_DEFAULT_KEY} to \"{name}\"?");
            if self
                .config()
                .set_push_default
                .resolve(self.prompter(), &question)
                .await?
            {
                git_config.set(PUSH_DEFAULT_KEY, name).await?;
            }
        }

        Ok(())
    }

    /// Rename a remote
    ///
    /// Renaming a remote to its current name is a no-op: nothing is
    /// spawned and `false` is returned.
    #[instrument(skip(self))]
    pub async fn remote_rename(&self, repo: &Path, old: &str, new: &str) -> Result<bool> {
        if old == new {
            debug!("remote {} already has that name, nothing to do", old);
            return Ok(false);
        }
        validate_remote_name(new)?;

        let backend = GitBackend::discover(repo)?;
        if !backend.remote_exists(old) {
            return Err(GitError::RemoteNotFound(old.to_string()).into());
        }
        if backend.remote_exists(new) {
            return Err(GitError::RemoteExists(new.to_string()).into());
        }

        let invocation = Invocation::new("remote")
            .operand("rename")
            .operand(old)
            .operand(new);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Renamed remote {} to {}", old, new);
        Ok(true)
    }

    /// Remove a remote
    ///
    /// A push default pointing at the removed remote is unset afterwards;
    /// git leaves the stale key behind on its own.
    #[instrument(skip(self))]
    pub async fn remote_remove(&self, repo: &Path, name: &str) -> Result<()> {
        let backend = GitBackend::discover(repo)?;
        if !backend.remote_exists(name) {
            return Err(GitError::RemoteNotFound(name.to_string()).into());
        }

        let invocation = Invocation::new("remote").operand("rm").operand(name);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        let git_config = GitConfig::new(backend.path());
        if git_config.get(PUSH_DEFAULT_KEY).await?.as_deref() == Some(name) {
            git_config.unset(PUSH_DEFAULT_KEY).await?;
        }

        info!("Removed remote {}", name);
        Ok(())
    }

    /// Change a remote's URL
    #[instrument(skip(self))]
    pub async fn remote_set_url(&self, repo: &Path, name: &str, url: &str) -> Result<()> {
        let backend = GitBackend::discover(repo)?;
        if !backend.remote_exists(name) {
            return Err(GitError::RemoteNotFound(name.to_string()).into());
        }

        let invocation = Invocation::new("remote")
            .operand("set-url")
            .operand(name)
            .operand(url);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Set url of remote {} to {}", name, url);
        Ok(())
    }

    /// Prune refs that no longer exist on a remote
    #[instrument(skip(self))]
    pub async fn remote_prune(&self, repo: &Path, name: &str) -> Result<()> {
        let backend = GitBackend::discover(repo)?;
        if !backend.remote_exists(name) {
            return Err(GitError::RemoteNotFound(name.to_string()).into());
        }

        let invocation = Invocation::new("remote").operand("prune").operand(name);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Pruned remote {}", name);
        Ok(())
    }
}
