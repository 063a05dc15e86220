//! Fetching from remotes

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{GitError, Result};
use crate::git::GitBackend;
use crate::runner::{GitFlag, Invocation};

use super::Courier;

/// Options for a fetch operation
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Remote to fetch from; falls back to the configured default
    pub remote: Option<String>,
    /// Optional refspec to fetch
    pub refspec: Option<String>,
    /// Fetch all remotes instead of one
    pub all: bool,
    /// Additional fetch flags (`--prune`, `--tags`, `--depth`, ...)
    pub flags: Vec<GitFlag>,
}

impl Courier {
    /// Fetch from a remote (or all remotes)
    ///
    /// A refspec only makes sense against a single remote; combining it
    /// with `all` is rejected before anything is spawned.
    #[instrument(skip(self, opts))]
    pub async fn fetch(&self, repo: &Path, opts: FetchOptions) -> Result<()> {
        if opts.all && opts.refspec.is_some() {
            return Err(crate::error::Error::Aborted(
                "cannot fetch a refspec from all remotes".to_string(),
            ));
        }

        let backend = GitBackend::discover(repo)?;

        let mut invocation = Invocation::new("fetch").flags(opts.flags);

        if opts.all {
            invocation = invocation.flag(GitFlag::All);
        } else {
            // Nonexistent remotes abort before anything is spawned.
            let remote = self.resolve_remote(&backend, opts.remote.as_deref())?;
            invocation = invocation.operand(remote);
            if let Some(refspec) = opts.refspec {
                invocation = invocation.operand(refspec);
            }
        }

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Fetched into {}", backend.repo_name());
        Ok(())
    }

    /// Resolve an optional remote name against the repository's remotes
    pub(crate) fn resolve_remote(
        &self,
        backend: &GitBackend,
        remote: Option<&str>,
    ) -> Result<String> {
        match remote {
            Some(name) => {
                if backend.remote_exists(name) {
                    Ok(name.to_string())
                } else {
                    Err(GitError::RemoteNotFound(name.to_string()).into())
                }
            }
            None => backend
                .default_remote(&self.config().default_remote)
                .ok_or_else(|| {
                    GitError::RemoteNotFound(self.config().default_remote.clone()).into()
                }),
        }
    }
}
