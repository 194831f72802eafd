use alloy::eips::BlockNumberOrTag;
use alloy::consensus::BlockHeader;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use omega_core::AppError;

/// Type-erased Ethereum-network HTTP provider used throughout the indexer.
pub type ChainProvider = DynProvider;

/// Create an HTTP provider from an RPC URL string.
pub fn create_provider(rpc_url: &str) -> Result<ChainProvider, AppError> {
    let url = rpc_url
        .parse()
        .map_err(|e| AppError::Config(format!("bad RPC_URL `{rpc_url}`: {e}")))?;
    let provider = ProviderBuilder::new().connect_http(url).erased();
    Ok(provider)
}

/// Fail fast when the endpoint serves a different chain than configured.
pub async fn ensure_chain_id(provider: &ChainProvider, expected: u64) -> Result<(), AppError> {
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| AppError::Rpc(e.to_string()))?;
    if actual != expected {
        return Err(AppError::ChainMismatch { expected, actual });
    }
    Ok(())
}

/// Timestamp of block `number`, for logs served without `blockTimestamp`.
pub async fn block_timestamp(provider: &ChainProvider, number: u64) -> Result<u64, AppError> {
    let block = provider
        .get_block_by_number(BlockNumberOrTag::Number(number))
        .await
        .map_err(|e| AppError::Rpc(e.to_string()))?
        .ok_or(AppError::BlockNotFound(number))?;
    Ok(block.header.timestamp())
}
