use omega_core::BigInt;
use omega_core::events::{EventPosition, FeePercentages, TokenType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Seconds per day bucket.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Entity type tag; the first half of every store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    User,
    Token,
    Lock,
    MultisendTransaction,
    FactoryStats,
    FactoryCreator,
    GlobalStats,
    DailyStats,
    IndexerCursor,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Token => "Token",
            EntityKind::Lock => "Lock",
            EntityKind::MultisendTransaction => "MultisendTransaction",
            EntityKind::FactoryStats => "FactoryStats",
            EntityKind::FactoryCreator => "FactoryCreator",
            EntityKind::GlobalStats => "GlobalStats",
            EntityKind::DailyStats => "DailyStats",
            EntityKind::IndexerCursor => "IndexerCursor",
        }
    }
}

/// Anything the entity store can hold.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_entity!(
    User,
    Token,
    Lock,
    MultisendTransaction,
    FactoryStats,
    FactoryCreator,
    GlobalStats,
    DailyStats,
    IndexerCursor,
);

// ─── User ───────────────────────────────────────────────────────────────────

/// An account that created a token, a lock or a multisend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Lowercase hex address.
    pub id: String,
    pub total_tokens_created: u64,
    pub total_locks_created: u64,
    pub total_multisends: u64,
    pub created_at: u64,
    pub last_activity_at: u64,
}

impl User {
    pub fn new(id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            total_tokens_created: 0,
            total_locks_created: 0,
            total_multisends: 0,
            created_at: timestamp,
            last_activity_at: timestamp,
        }
    }

    pub fn total_actions(&self) -> u64 {
        self.total_tokens_created + self.total_locks_created + self.total_multisends
    }
}

// ─── Token ──────────────────────────────────────────────────────────────────

/// A token deployed through one of the factories. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Lowercase hex token address.
    pub id: String,
    /// User id of the creator.
    pub creator: String,
    pub factory: String,
    pub token_type: TokenType,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: BigInt,
    pub initial_supply: BigInt,
    pub creation_fee: BigInt,
    pub reward_token: Option<String>,
    /// Constructor arguments of liquidity-gen tokens. No factory event
    /// carries them, so they stay `None` until read from the token itself.
    pub charity_wallet: Option<String>,
    pub router: Option<String>,
    #[serde(flatten)]
    pub fee_percentages: Option<FeePercentages>,
    pub creation_tx_hash: String,
    pub created_at: u64,
    pub block_number: u64,
}

// ─── Lock ───────────────────────────────────────────────────────────────────

/// A liquidity lock. Written once on creation, updated once on release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    /// Locker's numeric lock id, in decimal.
    pub id: String,
    pub lock_id: BigInt,
    /// User id of the owner.
    pub owner: String,
    pub token: String,
    pub amount: BigInt,
    pub unlock_time: BigInt,
    pub lock_time: u64,
    pub unlocked: bool,
    pub lock_fee: BigInt,
    pub tx_hash: String,
    pub block_number: u64,
    pub unlock_tx_hash: Option<String>,
    pub unlocked_at: Option<u64>,
}

impl Lock {
    pub fn id_for(lock_id: &BigInt) -> String {
        lock_id.to_string()
    }
}

// ─── MultisendTransaction ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultisendType {
    Native,
    Erc20,
}

/// One multisend log entry. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisendTransaction {
    /// `<txHash>-<logIndex>`.
    pub id: String,
    pub sender: String,
    pub transaction_type: MultisendType,
    pub token: Option<String>,
    pub total_amount: BigInt,
    pub recipient_count: BigInt,
    pub fee_charged: BigInt,
    pub tx_hash: String,
    pub timestamp: u64,
    pub block_number: u64,
}

impl MultisendTransaction {
    pub fn id_for(tx_hash: &str, log_index: u64) -> String {
        format!("{tx_hash}-{log_index}")
    }
}

// ─── FactoryStats ───────────────────────────────────────────────────────────

/// Running totals for one factory contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStats {
    /// Factory contract address.
    pub id: String,
    pub factory_type: TokenType,
    pub total_tokens_created: u64,
    /// Distinct creators that have used this factory.
    pub total_creators: u64,
    pub total_fees_collected: BigInt,
    pub last_token_created_at: u64,
}

impl FactoryStats {
    pub fn new(id: impl Into<String>, factory_type: TokenType) -> Self {
        Self {
            id: id.into(),
            factory_type,
            total_tokens_created: 0,
            total_creators: 0,
            total_fees_collected: BigInt::zero(),
            last_token_created_at: 0,
        }
    }
}

/// Marks that `creator` has created at least one token on `factory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryCreator {
    /// `<factory>-<creator>`.
    pub id: String,
    pub factory: String,
    pub creator: String,
    pub first_token_at: u64,
}

impl FactoryCreator {
    pub fn id_for(factory: &str, creator: &str) -> String {
        format!("{factory}-{creator}")
    }
}

// ─── GlobalStats ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub id: String,
    pub total_tokens: u64,
    pub total_locks: u64,
    pub total_multisends: u64,
    pub total_users: u64,
    pub total_volume_locked: BigInt,
    pub total_fees_collected: BigInt,
}

impl GlobalStats {
    pub const ID: &'static str = "global";
}

impl Default for GlobalStats {
    fn default() -> Self {
        Self {
            id: Self::ID.to_string(),
            total_tokens: 0,
            total_locks: 0,
            total_multisends: 0,
            total_users: 0,
            total_volume_locked: BigInt::zero(),
            total_fees_collected: BigInt::zero(),
        }
    }
}

// ─── DailyStats ─────────────────────────────────────────────────────────────

/// Activity within one UTC day, keyed by day index since epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub id: String,
    /// Bucket start, seconds since epoch.
    pub date: u64,
    pub tokens_created: u64,
    pub locks_created: u64,
    pub multisends: u64,
    pub new_users: u64,
    pub volume_locked: BigInt,
    pub fees_collected: BigInt,
}

impl DailyStats {
    pub fn day_index(timestamp: u64) -> u64 {
        timestamp / SECONDS_PER_DAY
    }

    pub fn id_for(timestamp: u64) -> String {
        Self::day_index(timestamp).to_string()
    }

    /// Empty bucket containing `timestamp`.
    pub fn for_timestamp(timestamp: u64) -> Self {
        let day = Self::day_index(timestamp);
        Self {
            id: day.to_string(),
            date: day * SECONDS_PER_DAY,
            tokens_created: 0,
            locks_created: 0,
            multisends: 0,
            new_users: 0,
            volume_locked: BigInt::zero(),
            fees_collected: BigInt::zero(),
        }
    }
}

// ─── IndexerCursor ──────────────────────────────────────────────────────────

/// Position of the last event applied to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerCursor {
    pub id: String,
    pub position: EventPosition,
    pub tx_hash: String,
}

impl IndexerCursor {
    pub const ID: &'static str = "cursor";
}
