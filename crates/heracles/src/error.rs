use std::path::PathBuf;

use hydra::HydraError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeraclesError>;

#[derive(Debug, Error)]
pub enum HeraclesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Hydra(#[from] HydraError),

    #[error("{path}:{line}: {source}")]
    AtLine {
        path: PathBuf,
        line: usize,
        source: HydraError,
    },
}

impl HeraclesError {
    /// 2 for bad input, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Hydra(_) | Self::AtLine { .. } => 2,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Hydra(HydraError::invalid(message))
    }

    /// The underlying library error, if there is one.
    #[must_use]
    pub fn hydra(&self) -> Option<&HydraError> {
        match self {
            Self::Hydra(error) | Self::AtLine { source: error, .. } => Some(error),
            _ => None,
        }
    }
}
