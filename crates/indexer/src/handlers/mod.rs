//! Per-event handlers. Each one folds a single validated event into the store.

mod lock;
mod multisend;
mod token;

pub use lock::{handle_lock_created, handle_lock_released};
pub use multisend::handle_multisend;
pub use token::handle_token_created;

use omega_storage::models::{DailyStats, GlobalStats, User};
use omega_storage::{Entity, EntityStore, StoreError};

use crate::aggregates::{self, Activity, StatsDelta};

/// What a handler did with its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// At or before the cursor; nothing written.
    Duplicate,
    /// Well-formed but with nothing to apply.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownLock,
    LockAlreadyReleased,
}

/// Loads or creates the user, advances one activity counter and saves it.
/// Returns true when the user did not exist before.
async fn touch_user<S: EntityStore>(
    store: &S,
    id: &str,
    activity: Activity,
    timestamp: u64,
) -> Result<bool, StoreError> {
    let existing = store.load::<User>(id).await?;
    let (user, created) = aggregates::apply_user(existing, id, activity, timestamp);
    store.save(&user).await?;
    if created {
        tracing::debug!(user = %id, "New user");
    }
    Ok(created)
}

/// Applies the event's delta to the global and daily aggregates, preceded by
/// a `NewUser` delta when the actor was just created. One load-modify-save
/// per aggregate.
async fn record_stats<S: EntityStore>(
    store: &S,
    timestamp: u64,
    new_user: bool,
    delta: StatsDelta,
) -> Result<(), StoreError> {
    let deltas: Vec<StatsDelta> = if new_user {
        vec![StatsDelta::NewUser, delta]
    } else {
        vec![delta]
    };

    let mut global = store.load::<GlobalStats>(GlobalStats::ID).await?;
    for delta in &deltas {
        global = Some(aggregates::apply_global(global, delta));
    }
    if let Some(global) = global {
        store.save(&global).await?;
    }

    let mut daily = store.load::<DailyStats>(&DailyStats::id_for(timestamp)).await?;
    for delta in &deltas {
        daily = Some(aggregates::apply_daily(daily, timestamp, delta));
    }
    if let Some(daily) = daily {
        store.save(&daily).await?;
    }

    Ok(())
}

/// Writes `entity` unless its key is already taken. Returns whether it wrote.
async fn insert_if_absent<S: EntityStore, E: Entity>(
    store: &S,
    entity: &E,
) -> Result<bool, StoreError> {
    if store.load::<E>(entity.id()).await?.is_some() {
        tracing::debug!(
            entity = E::KIND.as_str(),
            id = entity.id(),
            "Record already indexed, keeping stored copy"
        );
        return Ok(false);
    }
    store.save(entity).await?;
    Ok(true)
}
