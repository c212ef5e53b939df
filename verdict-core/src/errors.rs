use thiserror::Error;

/// Result type used across the Verdict core crate.
pub type Result<T> = std::result::Result<T, VerdictError>;

/// Canonical error representation for host process setup.
#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidValue { key: String, value: String },
}
