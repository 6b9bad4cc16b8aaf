use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImpactError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ImpactResult<T> = Result<T, ImpactError>;
