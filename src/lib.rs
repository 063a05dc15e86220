//! Git Courier - an async command-line companion for git remote operations
//!
//! Every operation follows the same contract: assemble a typed argument
//! vector, spawn the git binary without blocking, observe its termination
//! through an exactly-once completion signal, and only then apply any
//! policy-gated configuration side effects.
//!
//! # Architecture
//!
//! - **Runner** - the single place that spawns git and classifies its exit
//! - **Courier** - per-operation assembly and post-success policy
//! - **GitBackend** - read-side precondition checks via gitoxide
//!
//! # Modules
//!
//! - [`runner`] - typed invocations, async spawning, completion handling
//! - [`ops`] - clone, fetch, pull, push, remote management, patch mail
//! - [`git`] - repository read side (gitoxide) and config mutations (git CLI)
//! - [`config`] - layered configuration and side-effect policies
//! - [`prompt`] - confirmation seam for `ask` policies
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod git;
pub mod ops;
pub mod prompt;
pub mod runner;

pub use config::{Config, SideEffectPolicy};
pub use error::{Error, Result};
pub use ops::{CloneOptions, Courier, FetchOptions, FormatPatchOptions, PullOptions, PushOptions};
pub use runner::{CompletionResult, GitFlag, Invocation, ProcessHandle, Runner};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
