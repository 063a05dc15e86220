//! Configuration loading and policy values

mod settings;

pub use settings::*;
