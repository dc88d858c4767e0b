//! CLI error types.

use std::fmt;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Invalid arguments or configuration.
    Config(String),

    /// Failed to initialize logging.
    Logging(std::io::Error),

    /// Failed to create the Tokio runtime.
    Runtime(std::io::Error),

    /// Failed to create the directory provider.
    Provider(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to create Tokio runtime: {}", e),
            CliError::Provider(msg) => write!(f, "Failed to create directory provider: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) | CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<raksha::config::ConfigError> for CliError {
    fn from(e: raksha::config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
