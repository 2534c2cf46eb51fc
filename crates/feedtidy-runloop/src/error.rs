//! Error types for the controller and driver.

use feedtidy_config::ConfigError;
use feedtidy_protocols::DomError;
use thiserror::Error;

/// Errors that can occur while setting up or driving the controller.
#[derive(Debug, Error)]
pub enum RunLoopError {
    /// Configuration rejected by the validator.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The page contract in the configuration is unusable.
    #[error("Invalid page contract: {0}")]
    Contract(#[from] DomError),

    /// The host event channel closed.
    #[error("Host event channel closed")]
    ChannelClosed,
}

/// Result type for controller operations.
pub type RunLoopResult<T> = Result<T, RunLoopError>;
