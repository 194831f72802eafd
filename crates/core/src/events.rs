//! Decoded on-chain events, as delivered to the indexer.
//!
//! Addresses and hashes are lowercase `0x`-prefixed hex strings. Every
//! integer argument is a [`BigInt`] in base units.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bigint::BigInt;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Position of a log in the chain: block number, then log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u64,
}

impl Ord for EventPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.block_number
            .cmp(&other.block_number)
            .then(self.log_index.cmp(&other.log_index))
    }
}

impl PartialOrd for EventPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block_number, self.log_index)
    }
}

/// Log metadata shared by every event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Emitting contract.
    pub contract: String,
    pub block_number: u64,
    /// Block timestamp, seconds since epoch.
    pub timestamp: u64,
    pub tx_hash: String,
    pub log_index: u64,
}

impl EventMeta {
    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

/// The six token factory flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Standard,
    Antibot,
    LiquidityGen,
    AntiBotLiquidityGen,
    BuybackBaby,
    AntiBotBuybackBaby,
}

/// What a factory's `TokenCreated` event carries beyond the common fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenVariant {
    pub token_type: TokenType,
    /// Event carries the creation fee paid.
    pub has_creation_fee: bool,
    /// Event carries its own creation timestamp argument.
    pub has_own_timestamp: bool,
    /// Event carries reflection/liquidity/charity fee percentages.
    pub has_fee_percentages: bool,
    /// Event carries the dividend reward token.
    pub has_reward_token: bool,
}

impl TokenType {
    pub const ALL: [TokenType; 6] = [
        TokenType::Standard,
        TokenType::Antibot,
        TokenType::LiquidityGen,
        TokenType::AntiBotLiquidityGen,
        TokenType::BuybackBaby,
        TokenType::AntiBotBuybackBaby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Standard => "standard",
            TokenType::Antibot => "antibot",
            TokenType::LiquidityGen => "liquidityGen",
            TokenType::AntiBotLiquidityGen => "antiBotLiquidityGen",
            TokenType::BuybackBaby => "buybackBaby",
            TokenType::AntiBotBuybackBaby => "antiBotBuybackBaby",
        }
    }

    pub fn variant(&self) -> TokenVariant {
        let base = TokenVariant {
            token_type: *self,
            has_creation_fee: false,
            has_own_timestamp: false,
            has_fee_percentages: false,
            has_reward_token: false,
        };
        match self {
            TokenType::Standard => TokenVariant {
                has_creation_fee: true,
                has_own_timestamp: true,
                ..base
            },
            TokenType::Antibot => base,
            TokenType::LiquidityGen | TokenType::AntiBotLiquidityGen => TokenVariant {
                has_fee_percentages: true,
                ..base
            },
            TokenType::BuybackBaby | TokenType::AntiBotBuybackBaby => TokenVariant {
                has_reward_token: true,
                ..base
            },
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol fee percentages set at creation (liquidity generation tokens).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePercentages {
    pub reflection_fee: BigInt,
    pub liquidity_fee: BigInt,
    pub charity_fee: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreated {
    pub token_type: TokenType,
    pub token: String,
    pub creator: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: BigInt,
    pub creation_fee: Option<BigInt>,
    /// Creation timestamp emitted by the factory itself, if any.
    pub created_at: Option<u64>,
    pub reward_token: Option<String>,
    pub fee_percentages: Option<FeePercentages>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockCreated {
    pub lock_id: BigInt,
    pub token: String,
    pub owner: String,
    pub amount: BigInt,
    pub unlock_time: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReleased {
    pub lock_id: BigInt,
    pub token: String,
    pub owner: String,
    pub amount: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisend {
    pub sender: String,
    /// `None` for native-currency sends.
    pub token: Option<String>,
    pub total_amount: BigInt,
    pub recipient_count: BigInt,
    pub fee_charged: BigInt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    TokenCreated(TokenCreated),
    LockCreated(LockCreated),
    LockReleased(LockReleased),
    MultisendNative(Multisend),
    MultisendErc20(Multisend),
}

/// The closed set of event kinds the indexer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TokenCreated,
    LockCreated,
    LockReleased,
    MultisendNative,
    MultisendErc20,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TokenCreated => "tokenCreated",
            EventKind::LockCreated => "lockCreated",
            EventKind::LockReleased => "lockReleased",
            EventKind::MultisendNative => "multisendNative",
            EventKind::MultisendErc20 => "multisendErc20",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded log ready for the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEvent {
    pub meta: EventMeta,
    pub payload: EventPayload,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a lowercase hex address")]
    BadAddress { field: &'static str, value: String },

    #[error("{field} must not be the zero address")]
    ZeroAddress { field: &'static str },

    #[error("`{0}` is not a transaction hash")]
    BadTxHash(String),

    #[error("{token_type} TokenCreated is missing `{field}`")]
    MissingField {
        token_type: TokenType,
        field: &'static str,
    },

    #[error("ERC20 multisend without a token address")]
    MissingMultisendToken,

    #[error("native multisend carries a token address")]
    UnexpectedMultisendToken,
}

impl ChainEvent {
    pub fn kind(&self) -> EventKind {
        match &self.payload {
            EventPayload::TokenCreated(_) => EventKind::TokenCreated,
            EventPayload::LockCreated(_) => EventKind::LockCreated,
            EventPayload::LockReleased(_) => EventKind::LockReleased,
            EventPayload::MultisendNative(_) => EventKind::MultisendNative,
            EventPayload::MultisendErc20(_) => EventKind::MultisendErc20,
        }
    }

    pub fn position(&self) -> EventPosition {
        self.meta.position()
    }

    /// Check every field the handlers rely on. Runs before any store write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_address("contract", &self.meta.contract)?;
        check_tx_hash(&self.meta.tx_hash)?;

        match &self.payload {
            EventPayload::TokenCreated(e) => {
                check_actor("token", &e.token)?;
                check_actor("creator", &e.creator)?;
                let variant = e.token_type.variant();
                if variant.has_creation_fee && e.creation_fee.is_none() {
                    return Err(ValidationError::MissingField {
                        token_type: e.token_type,
                        field: "fee",
                    });
                }
                if variant.has_own_timestamp && e.created_at.is_none() {
                    return Err(ValidationError::MissingField {
                        token_type: e.token_type,
                        field: "timestamp",
                    });
                }
                if variant.has_reward_token {
                    match &e.reward_token {
                        Some(reward) => check_address("rewardToken", reward)?,
                        None => {
                            return Err(ValidationError::MissingField {
                                token_type: e.token_type,
                                field: "rewardToken",
                            });
                        }
                    }
                }
                if variant.has_fee_percentages && e.fee_percentages.is_none() {
                    return Err(ValidationError::MissingField {
                        token_type: e.token_type,
                        field: "feePercentages",
                    });
                }
            }
            EventPayload::LockCreated(e) => {
                check_actor("owner", &e.owner)?;
                check_actor("token", &e.token)?;
            }
            EventPayload::LockReleased(e) => {
                check_address("owner", &e.owner)?;
                check_address("token", &e.token)?;
            }
            EventPayload::MultisendNative(e) => {
                check_actor("sender", &e.sender)?;
                if e.token.is_some() {
                    return Err(ValidationError::UnexpectedMultisendToken);
                }
            }
            EventPayload::MultisendErc20(e) => {
                check_actor("sender", &e.sender)?;
                match &e.token {
                    Some(token) => check_actor("token", token)?,
                    None => return Err(ValidationError::MissingMultisendToken),
                }
            }
        }

        Ok(())
    }
}

pub fn is_address(value: &str) -> bool {
    is_lower_hex(value, 40)
}

fn is_lower_hex(value: &str, digits: usize) -> bool {
    value.len() == digits + 2
        && value.starts_with("0x")
        && value[2..]
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn check_address(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_address(value) {
        Ok(())
    } else {
        Err(ValidationError::BadAddress {
            field,
            value: value.to_string(),
        })
    }
}

/// An address that must identify a real account or contract.
fn check_actor(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check_address(field, value)?;
    if value == ZERO_ADDRESS {
        return Err(ValidationError::ZeroAddress { field });
    }
    Ok(())
}

fn check_tx_hash(value: &str) -> Result<(), ValidationError> {
    if is_lower_hex(value, 64) {
        Ok(())
    } else {
        Err(ValidationError::BadTxHash(value.to_string()))
    }
}
