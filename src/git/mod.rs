//! Local repository access
//!
//! - `GitBackend` - read-side queries via gitoxide (remotes, branches)
//! - `GitConfig` - config-key and symbolic-ref mutations via the git CLI

mod backend;
mod config;

pub use backend::*;
pub use config::*;
