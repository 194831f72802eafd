use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("entity (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for omega_core::AppError {
    fn from(err: StoreError) -> Self {
        omega_core::AppError::Database(err.to_string())
    }
}
