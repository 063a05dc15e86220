//! Repository read-side using pure gitoxide
//!
//! Precondition checks (does this remote exist, what branch is checked out)
//! are answered here without shelling out; every mutation goes through the
//! git CLI via the runner.

use std::path::{Path, PathBuf};

use gix::Repository;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// Read-only view of a local repository
pub struct GitBackend {
    /// The gitoxide repository handle
    repo: Repository,
    /// Path to the repository worktree (or git dir for bare repos)
    path: PathBuf,
}

impl GitBackend {
    /// Discover a repository from a path (searches parent directories)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo =
            gix::discover(path).map_err(|_e| GitError::NotARepository(path.to_path_buf()))?;

        let repo_path = repo
            .path()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| path.to_path_buf());

        debug!("Discovered repository at {:?}", repo_path);

        Ok(Self {
            repo,
            path: repo_path,
        })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| GitError::Gix(e.to_string()))?;

        match head.kind {
            gix::head::Kind::Symbolic(reference) => {
                let name = reference.name.shorten().to_string();
                Ok(name)
            }
            gix::head::Kind::Detached { .. } => {
                Err(GitError::InvalidRef("HEAD is detached".to_string()).into())
            }
            gix::head::Kind::Unborn(full_name) => {
                // Unborn branch still has a usable name
                let name = full_name.shorten().to_string();
                Ok(name)
            }
        }
    }

    /// Names of all configured remotes
    pub fn remote_names(&self) -> Vec<String> {
        self.repo
            .remote_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Check whether a remote is configured
    pub fn remote_exists(&self, name: &str) -> bool {
        self.remote_names().iter().any(|n| n == name)
    }

    /// Pick the remote an operation should default to
    ///
    /// Prefers `preferred` when configured, then the sole remote if there is
    /// exactly one.
    pub fn default_remote(&self, preferred: &str) -> Option<String> {
        if self.remote_exists(preferred) {
            return Some(preferred.to_string());
        }
        let names = self.remote_names();
        if names.len() == 1 {
            names.into_iter().next()
        } else {
            None
        }
    }

    /// Get the repository name (directory name)
    pub fn repo_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_test_repo() -> (TempDir, GitBackend) {
        let temp_dir = TempDir::new().unwrap();

        let repo = gix::init(temp_dir.path()).unwrap();

        let backend = GitBackend {
            repo,
            path: temp_dir.path().to_path_buf(),
        };

        (temp_dir, backend)
    }

    #[test]
    fn test_repo_name() {
        let (_temp, backend) = init_test_repo();
        // TempDir creates random names, so just check it's not empty
        assert!(!backend.repo_name().is_empty());
    }

    #[test]
    fn test_fresh_repo_has_no_remotes() {
        let (_temp, backend) = init_test_repo();
        assert!(backend.remote_names().is_empty());
        assert!(!backend.remote_exists("origin"));
        assert!(backend.default_remote("origin").is_none());
    }

    #[test]
    fn test_current_branch_unborn() {
        let (_temp, backend) = init_test_repo();
        // Newly initialized repo has an unborn 'main' or 'master' branch
        let branch = backend.current_branch();
        assert!(branch.is_ok());
    }
}
