//! Layout error types

use thiserror::Error;

/// Errors raised while setting up a view
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Failed to read a configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid TOML for a view config
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
