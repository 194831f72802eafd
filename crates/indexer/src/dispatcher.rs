//! Routes decoded events to their handlers and tracks the last applied
//! position so replays are rejected before anything is written.
//!
//! Every write an event causes, the cursor included, is staged in a
//! [`WriteSet`] and committed at once. An event is either fully applied or
//! not applied at all, even if `process` is cancelled or the store fails.

use omega_core::events::{ChainEvent, EventPayload, EventPosition};
use omega_storage::{EntityStore, WriteSet};
use omega_storage::models::{IndexerCursor, MultisendType};

use crate::error::IndexError;
use crate::handlers::{self, Outcome};

pub struct Indexer<S> {
    store: S,
}

impl<S: EntityStore> Indexer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Position of the last applied event, if any.
    pub async fn cursor(&self) -> Result<Option<EventPosition>, IndexError> {
        Ok(self
            .store
            .load::<IndexerCursor>(IndexerCursor::ID)
            .await?
            .map(|cursor| cursor.position))
    }

    /// Validates, deduplicates and applies one event.
    ///
    /// Events must arrive in ascending `(block, log index)` order; anything at
    /// or before the cursor is reported as [`Outcome::Duplicate`] untouched.
    pub async fn process(&self, event: &ChainEvent) -> Result<Outcome, IndexError> {
        event.validate()?;

        let position = event.position();
        if let Some(cursor) = self.cursor().await? {
            if position <= cursor {
                tracing::debug!(%position, %cursor, kind = %event.kind(), "Skipping already indexed event");
                return Ok(Outcome::Duplicate);
            }
        }

        let meta = &event.meta;
        let staged = WriteSet::new(&self.store);
        let outcome = match &event.payload {
            EventPayload::TokenCreated(e) => {
                handlers::handle_token_created(&staged, meta, e).await?
            }
            EventPayload::LockCreated(e) => handlers::handle_lock_created(&staged, meta, e).await?,
            EventPayload::LockReleased(e) => {
                handlers::handle_lock_released(&staged, meta, e).await?
            }
            EventPayload::MultisendNative(e) => {
                handlers::handle_multisend(&staged, meta, e, MultisendType::Native).await?
            }
            EventPayload::MultisendErc20(e) => {
                handlers::handle_multisend(&staged, meta, e, MultisendType::Erc20).await?
            }
        };

        staged
            .save(&IndexerCursor {
                id: IndexerCursor::ID.to_string(),
                position,
                tx_hash: meta.tx_hash.clone(),
            })
            .await?;

        tracing::debug!(%position, kind = %event.kind(), rows = staged.len(), "Committing event");
        staged.commit().await?;

        Ok(outcome)
    }
}
