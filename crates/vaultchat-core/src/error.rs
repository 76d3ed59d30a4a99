use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),
}
