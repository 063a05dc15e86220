//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::fmt;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::prompt::Prompter;

/// Three-state policy for an optional post-success side effect
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SideEffectPolicy {
    /// Apply the side effect without asking
    Always,
    /// Never apply the side effect
    Never,
    /// Ask before applying
    #[default]
    Ask,
}

impl SideEffectPolicy {
    /// Resolve the policy to a decision, consulting the prompter under `Ask`
    pub async fn resolve(&self, prompter: &dyn Prompter, question: &str) -> Result<bool> {
        match self {
            Self::Always => Ok(true),
            Self::Never => Ok(false),
            Self::Ask => prompter.confirm(question).await,
        }
    }
}

impl fmt::Display for SideEffectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
            Self::Ask => write!(f, "ask"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The git binary to run
    pub git_program: String,

    /// Remote name operations default to
    pub default_remote: String,

    /// Whether to set `remote.pushDefault` after clone / remote add
    pub set_push_default: SideEffectPolicy,

    /// Whether to keep `refs/remotes/<remote>/HEAD` after clone
    /// (when resolved to no, the symbolic ref is deleted)
    pub keep_remote_head: SideEffectPolicy,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (if set, logs to file instead of stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            default_remote: "origin".to_string(),
            set_push_default: SideEffectPolicy::Ask,
            keep_remote_head: SideEffectPolicy::Ask,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(&config_path))
            // Layer environment variables (GIT_COURIER_DEFAULT_REMOTE, etc.)
            .merge(Env::prefixed("GIT_COURIER_"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(&config_path, toml)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "git-courier", "git-courier").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PresetPrompter;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.git_program, "git");
        assert_eq!(config.default_remote, "origin");
        assert_eq!(config.set_push_default, SideEffectPolicy::Ask);
        assert_eq!(config.keep_remote_head, SideEffectPolicy::Ask);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("default_remote"));
        assert!(toml.contains("set_push_default"));
        assert!(toml.contains("ask"));
    }

    #[test]
    fn test_policy_parses_from_toml() {
        let config: Config = toml::from_str("set_push_default = \"always\"").unwrap();
        assert_eq!(config.set_push_default, SideEffectPolicy::Always);
        // Unnamed keys keep their defaults
        assert_eq!(config.keep_remote_head, SideEffectPolicy::Ask);
    }

    #[tokio::test]
    async fn test_policy_resolution() {
        let yes = PresetPrompter::new(true);
        let no = PresetPrompter::new(false);

        assert!(SideEffectPolicy::Always.resolve(&no, "?").await.unwrap());
        assert!(!SideEffectPolicy::Never.resolve(&yes, "?").await.unwrap());
        assert!(SideEffectPolicy::Ask.resolve(&yes, "?").await.unwrap());
        assert!(!SideEffectPolicy::Ask.resolve(&no, "?").await.unwrap());
    }
}
