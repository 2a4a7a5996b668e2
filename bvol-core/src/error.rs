use thiserror::Error;

use crate::xyz::XyzError;

#[derive(Error, Debug)]
pub enum BvolError {
    #[error("no metallic atom and no fallback center atom")]
    NoCenterAtomFound,

    #[error("no artifact stored for molecule {0}")]
    ArtifactNotFound(String),

    #[error("measurement failed: {0}")]
    MeasurementFailed(String),

    #[error("artifact could not be persisted: {0}")]
    ArtifactPersistFailed(String),

    #[error("invalid structure: {0}")]
    InvalidStructure(#[from] XyzError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BvolError {
    pub(crate) fn measurement(msg: impl Into<String>) -> Self {
        BvolError::MeasurementFailed(msg.into())
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, BvolError>;
