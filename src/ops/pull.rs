//! Pulling from remotes

use std::path::Path;

use tracing::{info, instrument};

use crate::error::Result;
use crate::git::GitBackend;
use crate::runner::{GitFlag, Invocation};

use super::Courier;

/// Options for a pull operation
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Remote to pull from; falls back to the configured default
    pub remote: Option<String>,
    /// Branch to pull; the remote's default when absent
    pub branch: Option<String>,
    /// Additional pull flags (`--rebase`, `--ff-only`, `--autostash`, ...)
    pub flags: Vec<GitFlag>,
}

impl PullOptions {
    /// Pull with `--rebase`
    pub fn rebase(mut self) -> Self {
        self.flags.push(GitFlag::Rebase);
        self
    }
}

impl Courier {
    /// Pull a branch from a remote into the current branch
    #[instrument(skip(self, opts))]
    pub async fn pull(&self, repo: &Path, opts: PullOptions) -> Result<()> {
        let backend = GitBackend::discover(repo)?;
        let remote = self.resolve_remote(&backend, opts.remote.as_deref())?;

        let mut invocation = Invocation::new("pull").flags(opts.flags).operand(&remote);
        if let Some(branch) = opts.branch {
            invocation = invocation.operand(branch);
        }

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Pulled from {} into {}", remote, backend.repo_name());
        Ok(())
    }
}
