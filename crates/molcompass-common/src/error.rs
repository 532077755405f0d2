use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompassError {
    #[error("Invalid SMILES string: {0}")]
    InvalidSmiles(String),

    #[error("Depiction error: {0}")]
    Depiction(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CompassError>;
