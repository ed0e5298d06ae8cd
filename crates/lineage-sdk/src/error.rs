use lineage_types::LineageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("lineage error: {0}")]
    Lineage(#[from] LineageError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Returns `true` if an object was used before registration.
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Lineage(err) if err.is_uninitialized())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
