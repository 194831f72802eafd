use std::str::FromStr;

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use omega_core::events::{
    EventMeta, EventPayload, FeePercentages, LockCreated, LockReleased, Multisend, TokenCreated,
};
use omega_core::{AppError, BigInt, ChainEvent, TokenType};

use crate::abi::{
    AntiBotTokenFactory, BuybackBabyTokenFactory, LiquidityGenTokenFactory, LiquidityLocker,
    Multisender, StandardTokenFactory,
};
use crate::registry::{ContractKind, ContractRegistry, token_created_signature};

/// Pulls a `TokenCreated` payload out of one factory flavour's log.
type TokenExtractor = fn(TokenType, &Log) -> Result<TokenCreated, AppError>;

fn token_extractor(token_type: TokenType) -> TokenExtractor {
    match token_type {
        TokenType::Standard => extract_standard,
        TokenType::Antibot => extract_antibot,
        TokenType::LiquidityGen | TokenType::AntiBotLiquidityGen => extract_liquidity_gen,
        TokenType::BuybackBaby | TokenType::AntiBotBuybackBaby => extract_buyback_baby,
    }
}

/// Decode a raw log into a [`ChainEvent`].
///
/// Returns `Ok(None)` for logs from contracts or topics the indexer does not
/// follow, and `Err` when a followed log cannot be decoded. `block_timestamp`
/// fills in for nodes that omit `blockTimestamp` on logs.
pub fn decode_log(
    registry: &ContractRegistry,
    log: &Log,
    block_timestamp: Option<u64>,
) -> Result<Option<ChainEvent>, AppError> {
    let Some(kind) = registry.kind_of(&log.address()) else {
        return Ok(None);
    };
    let Some(topic0) = log.topic0().copied() else {
        return Ok(None);
    };
    let ignored = || {
        tracing::debug!(contract = %log.address(), topic = %topic0, "Ignoring unrecognised log");
        Ok(None)
    };

    let payload = match kind {
        ContractKind::TokenFactory(token_type) => {
            if topic0 != token_created_signature(token_type) {
                return ignored();
            }
            EventPayload::TokenCreated(token_extractor(token_type)(token_type, log)?)
        }
        ContractKind::LiquidityLocker => {
            if topic0 == LiquidityLocker::ERC20Locked::SIGNATURE_HASH {
                let d = decode::<LiquidityLocker::ERC20Locked>(log)?;
                EventPayload::LockCreated(LockCreated {
                    lock_id: big(d.lockId)?,
                    token: hex_address(d.token),
                    owner: hex_address(d.owner),
                    amount: big(d.amount)?,
                    unlock_time: big(d.unlockTime)?,
                })
            } else if topic0 == LiquidityLocker::ERC20Withdrawn::SIGNATURE_HASH {
                let d = decode::<LiquidityLocker::ERC20Withdrawn>(log)?;
                EventPayload::LockReleased(LockReleased {
                    lock_id: big(d.lockId)?,
                    token: hex_address(d.token),
                    owner: hex_address(d.owner),
                    amount: big(d.amount)?,
                })
            } else {
                return ignored();
            }
        }
        ContractKind::Multisender => {
            if topic0 == Multisender::NativeMultisend::SIGNATURE_HASH {
                let d = decode::<Multisender::NativeMultisend>(log)?;
                EventPayload::MultisendNative(Multisend {
                    sender: hex_address(d.sender),
                    token: None,
                    total_amount: big(d.totalAmount)?,
                    recipient_count: big(d.recipientCount)?,
                    fee_charged: big(d.feeCharged)?,
                })
            } else if topic0 == Multisender::ERC20Multisend::SIGNATURE_HASH {
                let d = decode::<Multisender::ERC20Multisend>(log)?;
                EventPayload::MultisendErc20(Multisend {
                    sender: hex_address(d.sender),
                    token: Some(hex_address(d.token)),
                    total_amount: big(d.totalAmount)?,
                    recipient_count: big(d.recipientCount)?,
                    fee_charged: big(d.feeCharged)?,
                })
            } else {
                return ignored();
            }
        }
    };

    Ok(Some(ChainEvent {
        meta: event_meta(log, block_timestamp)?,
        payload,
    }))
}

fn event_meta(log: &Log, block_timestamp: Option<u64>) -> Result<EventMeta, AppError> {
    let block_number = log
        .block_number
        .ok_or_else(|| AppError::Decode("log without block number".into()))?;
    let tx_hash = log
        .transaction_hash
        .ok_or_else(|| AppError::Decode(format!("log in block {block_number} without tx hash")))?;
    let log_index = log
        .log_index
        .ok_or_else(|| AppError::Decode(format!("log in tx {tx_hash:#x} without log index")))?;
    let timestamp = log
        .block_timestamp
        .or(block_timestamp)
        .ok_or_else(|| AppError::Decode(format!("no timestamp for block {block_number}")))?;

    Ok(EventMeta {
        contract: hex_address(log.address()),
        block_number,
        timestamp,
        tx_hash: format!("{tx_hash:#x}"),
        log_index,
    })
}

fn decode<E: SolEvent>(log: &Log) -> Result<E, AppError> {
    log.log_decode::<E>()
        .map(|decoded| decoded.inner.data)
        .map_err(|e| AppError::Decode(format!("{}: {e}", E::SIGNATURE)))
}

fn hex_address(address: Address) -> String {
    format!("{address:#x}")
}

fn big(value: U256) -> Result<BigInt, AppError> {
    BigInt::from_str(&value.to_string()).map_err(|e| AppError::Decode(e.to_string()))
}

fn token_created(
    token_type: TokenType,
    token: Address,
    creator: Address,
    name: String,
    symbol: String,
    total_supply: U256,
) -> Result<TokenCreated, AppError> {
    Ok(TokenCreated {
        token_type,
        token: hex_address(token),
        creator: hex_address(creator),
        name,
        symbol,
        total_supply: big(total_supply)?,
        creation_fee: None,
        created_at: None,
        reward_token: None,
        fee_percentages: None,
    })
}

fn extract_standard(token_type: TokenType, log: &Log) -> Result<TokenCreated, AppError> {
    let d = decode::<StandardTokenFactory::TokenCreated>(log)?;
    let created_at = u64::try_from(d.timestamp)
        .map_err(|_| AppError::Decode(format!("timestamp {} overflows u64", d.timestamp)))?;
    Ok(TokenCreated {
        creation_fee: Some(big(d.fee)?),
        created_at: Some(created_at),
        ..token_created(
            token_type,
            d.tokenAddress,
            d.creator,
            d.name,
            d.symbol,
            d.initialSupply,
        )?
    })
}

fn extract_antibot(token_type: TokenType, log: &Log) -> Result<TokenCreated, AppError> {
    let d = decode::<AntiBotTokenFactory::TokenCreated>(log)?;
    token_created(token_type, d.token, d.creator, d.name, d.symbol, d.totalSupply)
}

fn extract_liquidity_gen(token_type: TokenType, log: &Log) -> Result<TokenCreated, AppError> {
    let d = decode::<LiquidityGenTokenFactory::TokenCreated>(log)?;
    let fee_percentages = FeePercentages {
        reflection_fee: big(d.reflectionFee)?,
        liquidity_fee: big(d.liquidityFee)?,
        charity_fee: big(d.charityFee)?,
    };
    Ok(TokenCreated {
        fee_percentages: Some(fee_percentages),
        ..token_created(token_type, d.token, d.creator, d.name, d.symbol, d.totalSupply)?
    })
}

fn extract_buyback_baby(token_type: TokenType, log: &Log) -> Result<TokenCreated, AppError> {
    let d = decode::<BuybackBabyTokenFactory::TokenCreated>(log)?;
    Ok(TokenCreated {
        reward_token: Some(hex_address(d.rewardToken)),
        ..token_created(token_type, d.token, d.creator, d.name, d.symbol, d.totalSupply)?
    })
}
