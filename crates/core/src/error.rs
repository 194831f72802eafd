use thiserror::Error;

/// Error type shared by the Omega crates outside the indexing core.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("RPC serves chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("block {0} not found on chain")]
    BlockNotFound(u64),

    #[error("entity store error: {0}")]
    Database(String),

    #[error("cannot decode log: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] eyre::Error),
}
