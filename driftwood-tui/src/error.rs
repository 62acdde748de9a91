//! Error types for the TUI.

use crate::config::ConfigError;
use driftwood_core::AddressError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("Logging init failed: {0}")]
    Logging(String),
}
