//! Accumulation rules for every aggregate entity.
//!
//! Each updater is a pure function of the stored aggregate (or `None` for a
//! key never seen) and one event's delta. Handlers never touch aggregate
//! counters directly.

use omega_core::{BigInt, TokenType};
use omega_storage::models::{DailyStats, FactoryStats, GlobalStats, User};

/// Which per-user counter an event advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    TokenCreated,
    LockCreated,
    Multisend,
}

/// Contribution of one event to the global and daily aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsDelta {
    TokenCreated { fee: BigInt },
    NewUser,
    LockCreated { volume: BigInt, fee: BigInt },
    Multisend { fee: BigInt },
}

/// Returns the updated user and whether this call created it.
pub fn apply_user(
    existing: Option<User>,
    id: &str,
    activity: Activity,
    timestamp: u64,
) -> (User, bool) {
    let created = existing.is_none();
    let mut user = existing.unwrap_or_else(|| User::new(id, timestamp));

    match activity {
        Activity::TokenCreated => user.total_tokens_created += 1,
        Activity::LockCreated => user.total_locks_created += 1,
        Activity::Multisend => user.total_multisends += 1,
    }
    user.last_activity_at = timestamp;

    (user, created)
}

/// One more token from factory `id`. `new_creator` is true when this is the
/// creator's first token on that factory.
pub fn apply_factory(
    existing: Option<FactoryStats>,
    id: &str,
    factory_type: TokenType,
    fee: &BigInt,
    timestamp: u64,
    new_creator: bool,
) -> FactoryStats {
    let mut stats = existing.unwrap_or_else(|| FactoryStats::new(id, factory_type));

    stats.total_tokens_created += 1;
    if new_creator {
        stats.total_creators += 1;
    }
    stats.total_fees_collected += fee;
    stats.last_token_created_at = timestamp;

    stats
}

pub fn apply_global(existing: Option<GlobalStats>, delta: &StatsDelta) -> GlobalStats {
    let mut stats = existing.unwrap_or_default();

    match delta {
        StatsDelta::TokenCreated { fee } => {
            stats.total_tokens += 1;
            stats.total_fees_collected += fee;
        }
        StatsDelta::NewUser => {
            stats.total_users += 1;
        }
        StatsDelta::LockCreated { volume, fee } => {
            stats.total_locks += 1;
            stats.total_volume_locked += volume;
            stats.total_fees_collected += fee;
        }
        StatsDelta::Multisend { fee } => {
            stats.total_multisends += 1;
            stats.total_fees_collected += fee;
        }
    }

    stats
}

/// Applies `delta` to the bucket of the day containing `timestamp`.
///
/// An `existing` bucket for a different day is ignored; the bucket is chosen
/// from the on-chain timestamp alone.
pub fn apply_daily(existing: Option<DailyStats>, timestamp: u64, delta: &StatsDelta) -> DailyStats {
    let id = DailyStats::id_for(timestamp);
    let mut stats = existing
        .filter(|bucket| bucket.id == id)
        .unwrap_or_else(|| DailyStats::for_timestamp(timestamp));

    match delta {
        StatsDelta::TokenCreated { fee } => {
            stats.tokens_created += 1;
            stats.fees_collected += fee;
        }
        StatsDelta::NewUser => {
            stats.new_users += 1;
        }
        StatsDelta::LockCreated { volume, fee } => {
            stats.locks_created += 1;
            stats.volume_locked += volume;
            stats.fees_collected += fee;
        }
        StatsDelta::Multisend { fee } => {
            stats.multisends += 1;
            stats.fees_collected += fee;
        }
    }

    stats
}
