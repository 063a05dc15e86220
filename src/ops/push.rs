//! Pushing to remotes
//!
//! The target remote resolves in order: explicit argument, the repository's
//! `remote.pushDefault`, then the configured default remote.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{GitError, Result};
use crate::git::{GitBackend, GitConfig, PUSH_DEFAULT_KEY};
use crate::runner::{GitFlag, Invocation};

use super::Courier;

/// Options for a push operation
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Remote to push to; resolved when absent
    pub remote: Option<String>,
    /// Refspec to push; the current branch when absent
    pub refspec: Option<String>,
    /// Additional push flags (`--force-with-lease`, `--tags`, `--dry-run`, ...)
    pub flags: Vec<GitFlag>,
}

impl PushOptions {
    /// Push with `--force-with-lease`
    pub fn force_with_lease(mut self) -> Self {
        self.flags.push(GitFlag::ForceWithLease);
        self
    }
}

impl Courier {
    /// Push a refspec (default: the current branch) to a remote
    #[instrument(skip(self, opts))]
    pub async fn push(&self, repo: &Path, opts: PushOptions) -> Result<()> {
        let backend = GitBackend::discover(repo)?;
        let git_config = GitConfig::new(backend.path());

        let remote = match opts.remote.as_deref() {
            Some(name) => {
                if !backend.remote_exists(name) {
                    return Err(GitError::RemoteNotFound(name.to_string()).into());
                }
                name.to_string()
            }
            None => match git_config.get(PUSH_DEFAULT_KEY).await? {
                Some(name) if backend.remote_exists(&name) => name,
                _ => self.resolve_remote(&backend, None)?,
            },
        };

        let refspec = match opts.refspec {
            Some(refspec) => refspec,
            None => backend.current_branch()?,
        };

        let invocation = Invocation::new("push")
            .flags(opts.flags)
            .operand(&remote)
            .operand(&refspec);

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Pushed {} to {}", refspec, remote);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_with_lease_appends_flag() {
        let opts = PushOptions::default().force_with_lease();
        assert!(opts.flags.contains(&GitFlag::ForceWithLease));
    }
}
