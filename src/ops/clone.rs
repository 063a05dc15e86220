//! Cloning and post-clone configuration
//!
//! After a successful clone that is neither bare nor mirror, two optional
//! side effects run, each gated by its policy:
//! - seed `remote.pushDefault` with the clone's remote name
//! - keep or delete the `refs/remotes/<remote>/HEAD` symbolic ref
//!
//! Both run strictly after the clone process has exited; a failed clone
//! touches no configuration.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::error::Result;
use crate::git::{GitConfig, PUSH_DEFAULT_KEY};
use crate::runner::{GitFlag, Invocation};

use super::Courier;

/// Options for a clone operation
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Repository URL to clone from
    pub url: String,
    /// Target directory; derived from the URL when absent
    pub directory: Option<PathBuf>,
    /// Additional clone flags (`--depth`, `--bare`, `--origin`, ...)
    pub flags: Vec<GitFlag>,
}

impl CloneOptions {
    /// Clone `url` into a directory named after the repository
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            directory: None,
            flags: Vec::new(),
        }
    }

    /// The remote name the clone will create
    pub fn remote_name(&self) -> &str {
        self.flags
            .iter()
            .find_map(|f| match f {
                GitFlag::Origin(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or("origin")
    }
}

/// Derive a target directory name from a repository URL
///
/// Takes the last path segment and strips a `.git` suffix.
pub fn clone_target_from_url(url: &str) -> Option<PathBuf> {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed
        .rsplit(['/', ':'])
        .next()
        .filter(|s| !s.is_empty())?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(PathBuf::from(name))
    }
}

impl Courier {
    /// Clone a repository, returning the target directory
    #[instrument(skip(self, opts), fields(url = %opts.url))]
    pub async fn clone(&self, working_dir: &Path, opts: CloneOptions) -> Result<PathBuf> {
        let target = match &opts.directory {
            Some(dir) => dir.clone(),
            None => clone_target_from_url(&opts.url).ok_or_else(|| {
                crate::error::Error::Aborted(format!(
                    "cannot derive a directory name from '{}'",
                    opts.url
                ))
            })?,
        };
        let remote = opts.remote_name().to_string();

        let invocation = Invocation::new("clone")
            .flags(opts.flags.clone())
            .operand(&opts.url)
            .operand(target.display().to_string());
        let plain_clone = !invocation.is_bare_or_mirror();

        let handle = self.runner().spawn(working_dir, invocation)?;
        handle.expect_success().await?;

        let target = if target.is_absolute() {
            target
        } else {
            working_dir.join(target)
        };
        info!("Cloned {} into {}", opts.url, target.display());

        // Bare and mirror clones get no config side effects.
        if plain_clone {
            self.apply_clone_side_effects(&target, &remote).await?;
        }

        Ok(target)
    }

    /// Policy-gated configuration side effects after a successful clone
    async fn apply_clone_side_effects(&self, repo_dir: &Path, remote: &str) -> Result<()> {
        let git_config = GitConfig::new(repo_dir);

        if git_config.get(PUSH_DEFAULT_KEY).await?.is_none() {
            let question = format!("Set {PUSH_DEFAULT_KEY} to \"{remote}\"?");
            if self
                .config()
                .set_push_default
                .resolve(self.prompter(), &question)
                .await?
            {
                git_config.set(PUSH_DEFAULT_KEY, remote).await?;
            }
        }

        let head_ref = format!("refs/remotes/{remote}/HEAD");
        let question = format!("Keep {head_ref}?");
        if self
            .config()
            .keep_remote_head
            .resolve(self.prompter(), &question)
            .await?
        {
            // Kept: make sure it points where the remote says it should.
            git_config.set_remote_head(remote).await?;
        } else {
            git_config.delete_symbolic_ref(&head_ref).await?;
        }

        Ok(())
    }
}
