use omega_core::events::ValidationError;
use omega_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Malformed event. Raised before any entity is written.
    #[error("invalid event: {0}")]
    Invalid(#[from] ValidationError),

    /// Store failure; the caller owns retries.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IndexError {
    /// Retrying the same event cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, IndexError::Invalid(_))
    }
}
