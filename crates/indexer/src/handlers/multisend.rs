use omega_core::events::{EventMeta, Multisend};
use omega_storage::models::{MultisendTransaction, MultisendType};
use omega_storage::{EntityStore, StoreError};

use super::{Outcome, insert_if_absent, record_stats, touch_user};
use crate::aggregates::{Activity, StatsDelta};

/// Native and ERC20 multisends differ only in `transaction_type` and `token`.
pub async fn handle_multisend<S: EntityStore>(
    store: &S,
    meta: &EventMeta,
    event: &Multisend,
    transaction_type: MultisendType,
) -> Result<Outcome, StoreError> {
    let new_user = touch_user(store, &event.sender, Activity::Multisend, meta.timestamp).await?;

    let token = match transaction_type {
        MultisendType::Native => None,
        MultisendType::Erc20 => event.token.clone(),
    };
    let record = MultisendTransaction {
        id: MultisendTransaction::id_for(&meta.tx_hash, meta.log_index),
        sender: event.sender.clone(),
        transaction_type,
        token,
        total_amount: event.total_amount.clone(),
        recipient_count: event.recipient_count.clone(),
        fee_charged: event.fee_charged.clone(),
        tx_hash: meta.tx_hash.clone(),
        timestamp: meta.timestamp,
        block_number: meta.block_number,
    };
    insert_if_absent(store, &record).await?;

    record_stats(
        store,
        meta.timestamp,
        new_user,
        StatsDelta::Multisend {
            fee: event.fee_charged.clone(),
        },
    )
    .await?;

    tracing::debug!(
        id = %record.id,
        sender = %event.sender,
        kind = ?transaction_type,
        recipients = %event.recipient_count,
        "Multisend indexed"
    );

    Ok(Outcome::Applied)
}
