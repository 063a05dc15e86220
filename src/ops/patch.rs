//! Patch mail: format-patch and request-pull

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::error::Result;
use crate::git::GitBackend;
use crate::runner::{GitFlag, Invocation};

use super::Courier;

/// Options for a format-patch operation
#[derive(Debug, Clone, Default)]
pub struct FormatPatchOptions {
    /// Revision range to format (e.g. `origin/main..HEAD`)
    pub range: Option<String>,
    /// Directory patch files are written to
    pub output_dir: Option<PathBuf>,
    /// Additional flags (`-N`, ...)
    pub flags: Vec<GitFlag>,
}

impl Courier {
    /// Write patch files for a revision range
    #[instrument(skip(self, opts))]
    pub async fn format_patch(&self, repo: &Path, opts: FormatPatchOptions) -> Result<()> {
        let backend = GitBackend::discover(repo)?;

        let mut invocation = Invocation::new("format-patch").flags(opts.flags);
        if let Some(dir) = &opts.output_dir {
            invocation =
                invocation.flag(GitFlag::OutputDirectory(dir.display().to_string()));
        }
        if let Some(range) = opts.range {
            invocation = invocation.operand(range);
        }

        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        info!("Wrote patches for {}", backend.repo_name());
        Ok(())
    }

    /// Print a pull request summary for changes since `start`
    ///
    /// `end` defaults to `HEAD` on the git side when absent.
    #[instrument(skip(self))]
    pub async fn request_pull(
        &self,
        repo: &Path,
        start: &str,
        url: &str,
        end: Option<&str>,
        include_patch: bool,
    ) -> Result<()> {
        let backend = GitBackend::discover(repo)?;

        let mut invocation = Invocation::new("request-pull");
        if include_patch {
            invocation = invocation.flag(GitFlag::IncludePatch);
        }
        invocation = invocation.operand(start).operand(url);
        if let Some(end) = end {
            invocation = invocation.operand(end);
        }

        // Output goes straight to the caller's stdout.
        let handle = self.runner().spawn(backend.path(), invocation)?;
        handle.expect_success().await?;

        Ok(())
    }
}
