use omega_core::BigInt;
use omega_core::events::{EventMeta, TokenCreated};
use omega_storage::models::{FactoryCreator, FactoryStats, Token};
use omega_storage::{EntityStore, StoreError};

use super::{Outcome, insert_if_absent, record_stats, touch_user};
use crate::aggregates::{self, Activity, StatsDelta};

/// Factory tokens are always deployed with 18 decimals.
pub const TOKEN_DECIMALS: u8 = 18;

/// Shared by all six factory variants. The variant descriptor decides which
/// optional fields are read.
pub async fn handle_token_created<S: EntityStore>(
    store: &S,
    meta: &EventMeta,
    event: &TokenCreated,
) -> Result<Outcome, StoreError> {
    let variant = event.token_type.variant();

    let fee = match (&event.creation_fee, variant.has_creation_fee) {
        (Some(fee), true) => fee.clone(),
        _ => BigInt::zero(),
    };
    let created_at = match event.created_at {
        Some(ts) if variant.has_own_timestamp => ts,
        _ => meta.timestamp,
    };

    let new_user = touch_user(store, &event.creator, Activity::TokenCreated, meta.timestamp).await?;

    let token = Token {
        id: event.token.clone(),
        creator: event.creator.clone(),
        factory: meta.contract.clone(),
        token_type: event.token_type,
        name: event.name.clone(),
        symbol: event.symbol.clone(),
        decimals: TOKEN_DECIMALS,
        total_supply: event.total_supply.clone(),
        initial_supply: event.total_supply.clone(),
        creation_fee: fee.clone(),
        reward_token: event.reward_token.clone().filter(|_| variant.has_reward_token),
        charity_wallet: None,
        router: None,
        fee_percentages: event.fee_percentages.clone().filter(|_| variant.has_fee_percentages),
        creation_tx_hash: meta.tx_hash.clone(),
        created_at,
        block_number: meta.block_number,
    };
    insert_if_absent(store, &token).await?;

    let marker_id = FactoryCreator::id_for(&meta.contract, &event.creator);
    let new_creator = store.load::<FactoryCreator>(&marker_id).await?.is_none();
    if new_creator {
        store
            .save(&FactoryCreator {
                id: marker_id,
                factory: meta.contract.clone(),
                creator: event.creator.clone(),
                first_token_at: created_at,
            })
            .await?;
    }

    let factory = store.load::<FactoryStats>(&meta.contract).await?;
    let factory = aggregates::apply_factory(
        factory,
        &meta.contract,
        event.token_type,
        &fee,
        created_at,
        new_creator,
    );
    store.save(&factory).await?;

    record_stats(store, meta.timestamp, new_user, StatsDelta::TokenCreated { fee }).await?;

    tracing::debug!(
        token = %event.token,
        creator = %event.creator,
        token_type = %event.token_type,
        block = meta.block_number,
        "Token created"
    );

    Ok(Outcome::Applied)
}
