//! Configuration loading for the driftwood TUI.
//!
//! A config path may come from `--config` or `DRIFTWOOD_TUI_CONFIG`; with
//! neither set the built-in demo configuration is used, matching the demo
//! workspaces the in-memory backend seeds.

use driftwood_core::WorkspaceAddress;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    /// Pub every per-workspace sync control targets.
    pub pub_url: String,
    /// Workspace addresses the in-memory backend is seeded with.
    pub seed_workspaces: Vec<String>,
    /// Short name used to seed each poster's ephemeral identity.
    pub author_seed: String,
    pub tick_interval_ms: u64,
    pub log_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::demo(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: TuiConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The out-of-the-box demo setup: two seeded workspaces and one
    /// simulated pub.
    pub fn demo() -> Self {
        Self {
            pub_url: "https://driftwood-pub.example".to_string(),
            seed_workspaces: vec![
                "+gardening.xxxxxxxxxxxxxxxxxxxx".to_string(),
                "+react.123".to_string(),
            ],
            author_seed: "test".to_string(),
            tick_interval_ms: 250,
            log_path: "tmp/driftwood-tui.log".into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pub_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "pub_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.seed_workspaces.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "seed_workspaces",
                reason: "must list at least one workspace".to_string(),
            });
        }
        for raw in &self.seed_workspaces {
            if let Err(err) = WorkspaceAddress::parse(raw) {
                return Err(ConfigError::InvalidValue {
                    field: "seed_workspaces",
                    reason: err.to_string(),
                });
            }
        }
        if self.author_seed.len() != 4
            || !self.author_seed.chars().all(|c| c.is_ascii_lowercase())
        {
            return Err(ConfigError::InvalidValue {
                field: "author_seed",
                reason: "must be exactly 4 lowercase ASCII letters".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os("DRIFTWOOD_TUI_CONFIG").map(PathBuf::from)
}
