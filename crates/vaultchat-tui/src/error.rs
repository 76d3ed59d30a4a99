//! Error types for the vaultchat-tui crate

use thiserror::Error;

/// Result type alias for vaultchat-tui operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vaultchat-tui
#[derive(Error, Debug)]
pub enum Error {
    /// UI rendering errors
    #[error("UI rendering error: {0}")]
    Rendering(String),

    /// Invalid state errors
    #[error("Invalid UI state: {0}")]
    InvalidState(String),

    /// Core errors from vaultchat-core
    #[error("Core error: {0}")]
    Core(#[from] vaultchat_core::Error),
}
