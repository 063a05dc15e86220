//! Git remote operations
//!
//! Each submodule assembles one operation: synchronous precondition checks,
//! a typed [`Invocation`], a spawn through the shared [`Runner`], and any
//! policy-gated side effects applied strictly after a confirmed success.
//!
//! - [`clone`] - clone plus post-clone config side effects
//! - [`fetch`] - fetch from one remote or all
//! - [`pull`] - pull with rebase/ff-only handling
//! - [`push`] - push to an explicit remote or the configured push default
//! - [`remote`] - remote add/rename/remove/set-url/prune
//! - [`patch`] - format-patch and request-pull

pub mod clone;
pub mod fetch;
pub mod patch;
pub mod pull;
pub mod push;
pub mod remote;

use std::sync::Arc;

use crate::config::Config;
use crate::prompt::Prompter;
use crate::runner::Runner;

pub use clone::CloneOptions;
pub use fetch::FetchOptions;
pub use patch::FormatPatchOptions;
pub use pull::PullOptions;
pub use push::PushOptions;

/// Coordinator for all remote operations
///
/// Holds the shared runner, user configuration, and the prompter consulted
/// by `ask` policies. Individual operations live in the submodules as
/// `impl Courier` blocks.
pub struct Courier {
    runner: Runner,
    config: Config,
    prompter: Arc<dyn Prompter>,
}

impl Courier {
    /// Create a coordinator from configuration and a prompter
    pub fn new(config: Config, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            runner: Runner::with_program(&config.git_program),
            config,
            prompter,
        }
    }

    /// The runner operations spawn through
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// The loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }
}
