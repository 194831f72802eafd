mod common;

use std::future::{Future, poll_fn};
use std::pin::pin;
use std::task::Poll;

use common::*;
use omega_core::TokenType;
use omega_indexer::{Indexer, Outcome};
use omega_storage::models::{DailyStats, FactoryStats, GlobalStats, Lock, User};
use omega_storage::{EntityKind, EntityStore, MemoryStore, Row, StoreError};
use serde_json::Value;

/// Memory store that suspends once inside every call, so a caller can be
/// cancelled between any two store operations.
#[derive(Default)]
struct YieldingStore {
    inner: MemoryStore,
}

impl EntityStore for YieldingStore {
    async fn load_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        tokio::task::yield_now().await;
        self.inner.load_raw(kind, id).await
    }

    async fn save_raw(&self, kind: EntityKind, id: &str, data: Value) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.inner.save_raw(kind, id, data).await
    }

    async fn save_all_raw(&self, rows: Vec<Row>) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.inner.save_all_raw(rows).await
    }
}

/// Polls `fut` at most `limit` times, then drops it.
async fn poll_at_most<F: Future>(fut: F, limit: usize) -> Option<F::Output> {
    let mut fut = pin!(fut);
    let mut polls = 0;
    poll_fn(|cx| {
        if let Poll::Ready(out) = fut.as_mut().poll(cx) {
            return Poll::Ready(Some(out));
        }
        polls += 1;
        if polls >= limit {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    })
    .await
}

const KINDS: [EntityKind; 9] = [
    EntityKind::User,
    EntityKind::Token,
    EntityKind::Lock,
    EntityKind::MultisendTransaction,
    EntityKind::FactoryStats,
    EntityKind::FactoryCreator,
    EntityKind::GlobalStats,
    EntityKind::DailyStats,
    EntityKind::IndexerCursor,
];

fn rows_stored(store: &MemoryStore) -> usize {
    KINDS.iter().map(|kind| store.count(*kind)).sum()
}

#[tokio::test]
async fn cancelled_event_is_all_or_nothing_and_replays_once() {
    let creator = addr(0xaaa);
    let event = token_created(
        meta(STANDARD_FACTORY, 9, 1, 3 * DAY),
        TokenType::Standard,
        &addr(0x1),
        &creator,
        25,
    );

    let mut finished_once = false;
    for limit in 1..64 {
        let indexer = Indexer::new(YieldingStore::default());

        let cut = poll_at_most(indexer.process(&event), limit).await;
        let finished = cut.is_some();
        let stored = rows_stored(&indexer.store().inner);
        match cut {
            None => assert_eq!(stored, 0, "partial write after {limit} polls"),
            Some(outcome) => {
                assert_eq!(outcome.unwrap(), Outcome::Applied);
                assert!(stored > 0);
                finished_once = true;
            }
        }

        // the runtime retries from the start of the batch
        let replay = indexer.process(&event).await.unwrap();
        let expected = if finished { Outcome::Duplicate } else { Outcome::Applied };
        assert_eq!(replay, expected, "replay after {limit} polls");

        let store = indexer.store();
        let user: User = store.load(&creator).await.unwrap().unwrap();
        assert_eq!(user.total_tokens_created, 1, "after {limit} polls");
        let global: GlobalStats = store.load(GlobalStats::ID).await.unwrap().unwrap();
        assert_eq!((global.total_tokens, global.total_users), (1, 1));
        assert_eq!(global.total_fees_collected, big(25));
        let factory: FactoryStats = store.load(STANDARD_FACTORY).await.unwrap().unwrap();
        assert_eq!((factory.total_tokens_created, factory.total_creators), (1, 1));
        let day: DailyStats = store.load("3").await.unwrap().unwrap();
        assert_eq!((day.tokens_created, day.new_users), (1, 1));
    }
    assert!(finished_once, "no poll limit let the event finish");
}

#[tokio::test]
async fn cancelled_release_does_not_half_unlock() {
    let owner = addr(0xbbb);
    let mut last_finished = false;

    for limit in 1..32 {
        let indexer = Indexer::new(YieldingStore::default());
        indexer
            .process(&lock_created(meta(LOCKER, 1, 0, DAY), 4, &owner, 100))
            .await
            .unwrap();
        let before = rows_stored(&indexer.store().inner);

        let release = lock_released(meta(LOCKER, 2, 0, DAY + 60), 4, &owner, 100);
        let cut = poll_at_most(indexer.process(&release), limit).await;
        let finished = cut.is_some();
        let lock: Lock = indexer.store().load("4").await.unwrap().unwrap();
        let cursor = indexer.cursor().await.unwrap().map(|c| c.block_number);

        if finished {
            assert!(lock.unlocked);
            assert_eq!(cursor, Some(2));
        } else {
            assert!(!lock.unlocked);
            assert_eq!(cursor, Some(1));
            assert_eq!(rows_stored(&indexer.store().inner), before);
        }
        last_finished = finished;
    }
    assert!(last_finished);
}
