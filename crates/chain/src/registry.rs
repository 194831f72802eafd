use std::collections::HashMap;
use std::str::FromStr;

use alloy::primitives::{Address, B256};
use alloy::sol_types::SolEvent;
use omega_core::{AppError, ContractAddresses, TokenType};

use crate::abi::{
    AntiBotTokenFactory, BuybackBabyTokenFactory, LiquidityGenTokenFactory, LiquidityLocker,
    Multisender, StandardTokenFactory,
};

/// What a watched contract is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    TokenFactory(TokenType),
    LiquidityLocker,
    Multisender,
}

/// `TokenCreated` topic emitted by factories of `token_type`.
pub fn token_created_signature(token_type: TokenType) -> B256 {
    match token_type {
        TokenType::Standard => StandardTokenFactory::TokenCreated::SIGNATURE_HASH,
        TokenType::Antibot => AntiBotTokenFactory::TokenCreated::SIGNATURE_HASH,
        TokenType::LiquidityGen | TokenType::AntiBotLiquidityGen => {
            LiquidityGenTokenFactory::TokenCreated::SIGNATURE_HASH
        }
        TokenType::BuybackBaby | TokenType::AntiBotBuybackBaby => {
            BuybackBabyTokenFactory::TokenCreated::SIGNATURE_HASH
        }
    }
}

/// Address → contract kind for every contract the indexer follows.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: HashMap<Address, ContractKind>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_addresses(addresses: &ContractAddresses) -> Result<Self, AppError> {
        let entries = [
            (
                &addresses.standard_factory,
                ContractKind::TokenFactory(TokenType::Standard),
            ),
            (
                &addresses.antibot_factory,
                ContractKind::TokenFactory(TokenType::Antibot),
            ),
            (
                &addresses.liquidity_gen_factory,
                ContractKind::TokenFactory(TokenType::LiquidityGen),
            ),
            (
                &addresses.antibot_liquidity_gen_factory,
                ContractKind::TokenFactory(TokenType::AntiBotLiquidityGen),
            ),
            (
                &addresses.buyback_baby_factory,
                ContractKind::TokenFactory(TokenType::BuybackBaby),
            ),
            (
                &addresses.antibot_buyback_baby_factory,
                ContractKind::TokenFactory(TokenType::AntiBotBuybackBaby),
            ),
            (&addresses.liquidity_locker, ContractKind::LiquidityLocker),
            (&addresses.multisender, ContractKind::Multisender),
        ];

        let mut registry = Self::new();
        for (raw, kind) in entries {
            let address = Address::from_str(raw.trim())
                .map_err(|e| AppError::Config(format!("bad contract address `{raw}`: {e}")))?;
            if let Some(previous) = registry.contracts.insert(address, kind) {
                return Err(AppError::Config(format!(
                    "{address:#x} configured as both {previous:?} and {kind:?}"
                )));
            }
        }
        Ok(registry)
    }

    pub fn insert(&mut self, address: Address, kind: ContractKind) {
        self.contracts.insert(address, kind);
    }

    pub fn kind_of(&self, address: &Address) -> Option<ContractKind> {
        self.contracts.get(address).copied()
    }

    /// Every watched address, sorted for stable filters.
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.contracts.keys().copied().collect();
        addresses.sort();
        addresses
    }

    /// Distinct topic0 values of every event the watched contracts emit.
    pub fn event_signatures(&self) -> Vec<B256> {
        let mut topics: Vec<B256> = self
            .contracts
            .values()
            .flat_map(|kind| match kind {
                ContractKind::TokenFactory(t) => vec![token_created_signature(*t)],
                ContractKind::LiquidityLocker => vec![
                    LiquidityLocker::ERC20Locked::SIGNATURE_HASH,
                    LiquidityLocker::ERC20Withdrawn::SIGNATURE_HASH,
                ],
                ContractKind::Multisender => vec![
                    Multisender::NativeMultisend::SIGNATURE_HASH,
                    Multisender::ERC20Multisend::SIGNATURE_HASH,
                ],
            })
            .collect();
        topics.sort();
        topics.dedup();
        topics
    }
}
