use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration source not found: {0}")]
    SourceNotFound(String),

    #[error("configuration parsing failed: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
