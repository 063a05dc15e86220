//! Async process spawning and completion handling
//!
//! `Runner::spawn` starts the git binary without blocking the caller and
//! returns a [`ProcessHandle`]. A detached wait task observes OS-level
//! termination, classifies it into a [`CompletionResult`], and resolves a
//! oneshot channel, so completion is delivered exactly once and never
//! before the process has fully exited.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, error, instrument, warn};

use crate::error::{ProcessError, Result, SpawnError};

use super::Invocation;

/// Tagged outcome of a finished external process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionResult {
    /// The process exited with code 0
    Success,
    /// The process exited with a nonzero code
    Failure(i32),
    /// The process was terminated by a signal
    Signaled,
}

impl CompletionResult {
    /// Whether the process exited cleanly
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Self::Success,
            Some(code) => Self::Failure(code),
            // No exit code means the process was killed by a signal
            None => Self::Signaled,
        }
    }
}

/// One in-flight external process
///
/// Owned by the caller; the runner keeps no reference to it. Consuming the
/// handle via [`wait`](ProcessHandle::wait) is the only way to observe the
/// outcome, which guarantees at most one delivery per process.
#[derive(Debug)]
pub struct ProcessHandle {
    id: Option<u32>,
    working_dir: PathBuf,
    context: String,
    completion: oneshot::Receiver<CompletionResult>,
    report_failures: bool,
}

impl ProcessHandle {
    /// OS process id, if the process is still identifiable
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    /// Directory the process was spawned in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The logical operation that created this process (the git subcommand)
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Suppress failure reporting for this process
    ///
    /// Used by callers that treat a nonzero exit as an expected answer
    /// rather than an error.
    pub fn silenced(mut self) -> Self {
        self.report_failures = false;
        self
    }

    /// Wait for the process to terminate and return the classified outcome
    ///
    /// Resolves strictly after OS-level termination. Failures are surfaced
    /// via the log unless the handle was [`silenced`](ProcessHandle::silenced).
    pub async fn wait(self) -> Result<CompletionResult> {
        let result = self
            .completion
            .await
            .map_err(|_| ProcessError::Disconnected)?;

        match result {
            CompletionResult::Success => {
                debug!(context = %self.context, "git exited successfully");
            }
            CompletionResult::Failure(code) if self.report_failures => {
                error!(context = %self.context, code, "git {} exited with code {}", self.context, code);
            }
            CompletionResult::Signaled if self.report_failures => {
                error!(context = %self.context, "git {} was terminated by a signal", self.context);
            }
            _ => {}
        }

        Ok(result)
    }

    /// Wait for termination and map anything but a clean exit to an error
    pub async fn expect_success(self) -> Result<()> {
        let context = self.context.clone();
        match self.wait().await? {
            CompletionResult::Success => Ok(()),
            CompletionResult::Failure(code) => {
                Err(ProcessError::Failed { context, code }.into())
            }
            CompletionResult::Signaled => Err(ProcessError::Signaled { context }.into()),
        }
    }
}

/// Async runner for the external git binary
///
/// Every operation goes through [`spawn`](Runner::spawn), so process
/// management lives in one place instead of being re-implemented per
/// command.
#[derive(Debug, Clone)]
pub struct Runner {
    program: String,
}

impl Runner {
    /// Create a runner for the `git` binary found on PATH
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Create a runner for a specific binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this runner spawns
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the binary is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|_| SpawnError::BinaryNotFound {
                program: self.program.clone(),
            })?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("{} version: {}", self.program, version.trim());
            Ok(())
        } else {
            Err(SpawnError::BinaryNotFound {
                program: self.program.clone(),
            }
            .into())
        }
    }

    /// Spawn the binary in `working_dir` without waiting for it
    ///
    /// Precondition failures (missing directory, missing binary, empty
    /// invocation) are reported synchronously as [`SpawnError`] before any
    /// asynchronous work begins; no process exists when this returns `Err`.
    ///
    /// stdout/stderr are inherited so transfer progress stays visible.
    #[instrument(skip(self, invocation), fields(invocation = %invocation))]
    pub fn spawn(&self, working_dir: &Path, invocation: Invocation) -> Result<ProcessHandle> {
        if invocation.is_empty() {
            return Err(SpawnError::EmptyInvocation.into());
        }
        if !working_dir.exists() {
            return Err(SpawnError::MissingWorkingDir(working_dir.to_path_buf()).into());
        }
        if !working_dir.is_dir() {
            return Err(SpawnError::NotADirectory(working_dir.to_path_buf()).into());
        }

        let mut cmd = Command::new(&self.program);
        cmd.current_dir(working_dir)
            .args(invocation.to_args())
            .stdin(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpawnError::BinaryNotFound {
                    program: self.program.clone(),
                }
            } else {
                SpawnError::Io {
                    program: self.program.clone(),
                    source: e,
                }
            }
        })?;

        let id = child.id();
        let context = invocation.subcommand().to_string();
        debug!(pid = ?id, context = %context, "spawned {}", invocation);

        let (tx, rx) = oneshot::channel();
        let wait_context = context.clone();
        tokio::spawn(async move {
            let result = match child.wait().await {
                Ok(status) => CompletionResult::from_status(status),
                Err(e) => {
                    // Waiting itself failed; the child is unreachable, which
                    // is indistinguishable from an external kill here.
                    warn!(context = %wait_context, "failed to wait on child: {}", e);
                    CompletionResult::Signaled
                }
            };
            // The receiver may have been dropped; nothing to do then.
            let _ = tx.send(result);
        });

        Ok(ProcessHandle {
            id,
            working_dir: working_dir.to_path_buf(),
            context,
            completion: rx,
            report_failures: true,
        })
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
