use thiserror::Error;

pub type Result<T> = std::result::Result<T, HydraError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HydraError {
    #[error("bad pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },

    #[error("conflicting pattern: {incoming} disagrees with stored {existing}")]
    ConflictingPattern { existing: String, incoming: String },

    #[error("index {index} out of bounds (length {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("pattern {pattern} is frozen")]
    FrozenPattern { pattern: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl HydraError {
    #[must_use]
    pub fn bad_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::OutOfBounds { index, len }
    }
}
