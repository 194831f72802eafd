use omega_core::BigInt;
use omega_core::events::{EventMeta, LockCreated, LockReleased};
use omega_storage::models::Lock;
use omega_storage::{EntityStore, StoreError};

use super::{Outcome, SkipReason, insert_if_absent, record_stats, touch_user};
use crate::aggregates::{Activity, StatsDelta};

pub async fn handle_lock_created<S: EntityStore>(
    store: &S,
    meta: &EventMeta,
    event: &LockCreated,
) -> Result<Outcome, StoreError> {
    let new_user = touch_user(store, &event.owner, Activity::LockCreated, meta.timestamp).await?;

    // the locker charges nothing
    let fee = BigInt::zero();
    let lock = Lock {
        id: Lock::id_for(&event.lock_id),
        lock_id: event.lock_id.clone(),
        owner: event.owner.clone(),
        token: event.token.clone(),
        amount: event.amount.clone(),
        unlock_time: event.unlock_time.clone(),
        lock_time: meta.timestamp,
        unlocked: false,
        lock_fee: fee.clone(),
        tx_hash: meta.tx_hash.clone(),
        block_number: meta.block_number,
        unlock_tx_hash: None,
        unlocked_at: None,
    };
    insert_if_absent(store, &lock).await?;

    record_stats(
        store,
        meta.timestamp,
        new_user,
        StatsDelta::LockCreated {
            volume: event.amount.clone(),
            fee,
        },
    )
    .await?;

    tracing::debug!(
        lock_id = %event.lock_id,
        owner = %event.owner,
        amount = %event.amount,
        "Lock created"
    );

    Ok(Outcome::Applied)
}

/// Marks the lock released. Aggregates are cumulative and stay untouched.
pub async fn handle_lock_released<S: EntityStore>(
    store: &S,
    meta: &EventMeta,
    event: &LockReleased,
) -> Result<Outcome, StoreError> {
    let id = Lock::id_for(&event.lock_id);

    let Some(mut lock) = store.load::<Lock>(&id).await? else {
        tracing::warn!(lock_id = %id, tx = %meta.tx_hash, "Release for unknown lock, ignoring");
        return Ok(Outcome::Skipped(SkipReason::UnknownLock));
    };

    if lock.unlocked {
        tracing::debug!(lock_id = %id, tx = %meta.tx_hash, "Lock already released");
        return Ok(Outcome::Skipped(SkipReason::LockAlreadyReleased));
    }

    lock.unlocked = true;
    lock.unlock_tx_hash = Some(meta.tx_hash.clone());
    lock.unlocked_at = Some(meta.timestamp);
    store.save(&lock).await?;

    tracing::debug!(lock_id = %id, owner = %lock.owner, "Lock released");

    Ok(Outcome::Applied)
}
