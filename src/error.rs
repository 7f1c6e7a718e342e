use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenePoolError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Probability out of range [0, 1]: {0}")]
    InvalidProbability(f64),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GenePoolError>;
