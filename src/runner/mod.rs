//! Async execution of the external git binary
//!
//! Provides the single point where "start an external command" is decoupled
//! from "react to its result":
//! - `Invocation` / `GitFlag` - typed argument-vector construction
//! - `Runner` - non-blocking spawn with synchronous precondition checks
//! - `ProcessHandle` / `CompletionResult` - exactly-once completion delivery

mod invocation;
mod process;

pub use invocation::*;
pub use process::*;
