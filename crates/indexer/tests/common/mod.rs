#![allow(dead_code)]

use omega_core::BigInt;
use omega_core::events::{
    ChainEvent, EventMeta, EventPayload, FeePercentages, LockCreated, LockReleased, Multisend,
    TokenCreated, TokenType,
};

pub const DAY: u64 = 86_400;

pub const STANDARD_FACTORY: &str = "0x00000000000000000000000000000000000000f1";
pub const ANTIBOT_FACTORY: &str = "0x00000000000000000000000000000000000000f2";
pub const LIQUIDITY_GEN_FACTORY: &str = "0x00000000000000000000000000000000000000f3";
pub const BUYBACK_BABY_FACTORY: &str = "0x00000000000000000000000000000000000000f5";
pub const LOCKER: &str = "0x00000000000000000000000000000000000000aa";
pub const MULTISENDER: &str = "0x00000000000000000000000000000000000000bb";

/// Deterministic lowercase address ending in `n`.
pub fn addr(n: u64) -> String {
    format!("0x{n:040x}")
}

pub fn tx(n: u64) -> String {
    format!("0x{n:064x}")
}

pub fn big(n: u64) -> BigInt {
    BigInt::from(n)
}

pub fn meta(contract: &str, block: u64, log_index: u64, timestamp: u64) -> EventMeta {
    EventMeta {
        contract: contract.to_string(),
        block_number: block,
        timestamp,
        tx_hash: tx(block * 1_000 + log_index),
        log_index,
    }
}

/// Hands out strictly increasing positions.
#[derive(Default)]
pub struct Chain {
    block: u64,
}

impl Chain {
    pub fn next(&mut self, contract: &str, timestamp: u64) -> EventMeta {
        self.block += 1;
        meta(contract, self.block, 0, timestamp)
    }
}

pub fn token_created(
    meta: EventMeta,
    token_type: TokenType,
    token: &str,
    creator: &str,
    fee: u64,
) -> ChainEvent {
    let variant = token_type.variant();
    let created_at = meta.timestamp;
    ChainEvent {
        meta,
        payload: EventPayload::TokenCreated(TokenCreated {
            token_type,
            token: token.to_string(),
            creator: creator.to_string(),
            name: "Omega".to_string(),
            symbol: "OMG".to_string(),
            total_supply: big(1_000_000),
            creation_fee: variant.has_creation_fee.then(|| big(fee)),
            created_at: variant.has_own_timestamp.then_some(created_at),
            reward_token: variant.has_reward_token.then(|| addr(0xeee)),
            fee_percentages: variant.has_fee_percentages.then(|| FeePercentages {
                reflection_fee: big(2),
                liquidity_fee: big(3),
                charity_fee: big(1),
            }),
        }),
    }
}

pub fn lock_created(meta: EventMeta, lock_id: u64, owner: &str, amount: u64) -> ChainEvent {
    ChainEvent {
        meta,
        payload: EventPayload::LockCreated(LockCreated {
            lock_id: big(lock_id),
            token: addr(0x70),
            owner: owner.to_string(),
            amount: big(amount),
            unlock_time: big(2_000_000_000),
        }),
    }
}

pub fn lock_released(meta: EventMeta, lock_id: u64, owner: &str, amount: u64) -> ChainEvent {
    ChainEvent {
        meta,
        payload: EventPayload::LockReleased(LockReleased {
            lock_id: big(lock_id),
            token: addr(0x70),
            owner: owner.to_string(),
            amount: big(amount),
        }),
    }
}

pub fn native_multisend(meta: EventMeta, sender: &str, total: u64, recipients: u64, fee: u64) -> ChainEvent {
    ChainEvent {
        meta,
        payload: EventPayload::MultisendNative(Multisend {
            sender: sender.to_string(),
            token: None,
            total_amount: big(total),
            recipient_count: big(recipients),
            fee_charged: big(fee),
        }),
    }
}

pub fn erc20_multisend(meta: EventMeta, sender: &str, token: &str, total: u64, fee: u64) -> ChainEvent {
    ChainEvent {
        meta,
        payload: EventPayload::MultisendErc20(Multisend {
            sender: sender.to_string(),
            token: Some(token.to_string()),
            total_amount: big(total),
            recipient_count: big(3),
            fee_charged: big(fee),
        }),
    }
}
