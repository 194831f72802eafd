mod common;

use common::*;
use omega_core::{BigInt, TokenType};
use omega_indexer::{Indexer, Outcome};
use omega_storage::models::{
    DailyStats, FactoryStats, GlobalStats, Lock, MultisendTransaction, MultisendType, Token, User,
};
use omega_storage::{EntityKind, EntityStore, MemoryStore};

async fn global(indexer: &Indexer<MemoryStore>) -> GlobalStats {
    indexer
        .store()
        .load::<GlobalStats>(GlobalStats::ID)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn standard_token_creation_updates_every_aggregate() {
    let indexer = Indexer::new(MemoryStore::new());
    let creator = addr(0xaaa);
    let token = addr(0x1234);
    let ts = 1_700_000_000;
    let ten_ether: BigInt = "10000000000000000000".parse().unwrap();

    let event = token_created(
        meta(STANDARD_FACTORY, 100, 2, ts),
        TokenType::Standard,
        &token,
        &creator,
        10_000_000_000_000_000_000,
    );
    assert_eq!(indexer.process(&event).await.unwrap(), Outcome::Applied);

    let store = indexer.store();
    let user: User = store.load(&creator).await.unwrap().unwrap();
    assert_eq!(user.total_tokens_created, 1);
    assert_eq!(user.created_at, ts);

    let record: Token = store.load(&token).await.unwrap().unwrap();
    assert_eq!(record.token_type, TokenType::Standard);
    assert_eq!(record.creator, creator);
    assert_eq!(record.factory, STANDARD_FACTORY);
    assert_eq!(record.decimals, 18);
    assert_eq!(record.initial_supply, record.total_supply);
    assert_eq!(record.creation_fee, ten_ether);
    assert_eq!(record.block_number, 100);

    let factory: FactoryStats = store.load(STANDARD_FACTORY).await.unwrap().unwrap();
    assert_eq!(factory.total_tokens_created, 1);
    assert_eq!(factory.total_creators, 1);
    assert_eq!(factory.total_fees_collected, ten_ether);

    let stats = global(&indexer).await;
    assert_eq!(stats.total_tokens, 1);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_fees_collected, ten_ether);

    let day: DailyStats = store.load(&DailyStats::id_for(ts)).await.unwrap().unwrap();
    assert_eq!(day.tokens_created, 1);
    assert_eq!(day.new_users, 1);
    assert_eq!(day.fees_collected, ten_ether);
}

#[tokio::test]
async fn lock_then_release_flips_lock_but_not_totals() {
    let indexer = Indexer::new(MemoryStore::new());
    let owner = addr(0xbbb);
    let ts = 1_700_000_000;

    let mut created = lock_created(meta(LOCKER, 10, 0, ts), 7, &owner, 500);
    if let omega_core::EventPayload::LockCreated(e) = &mut created.payload {
        e.unlock_time = big(ts + 2_592_000);
    }
    indexer.process(&created).await.unwrap();

    let lock: Lock = indexer.store().load("7").await.unwrap().unwrap();
    assert!(!lock.unlocked);
    assert_eq!(lock.amount, big(500));
    assert_eq!(lock.lock_time, ts);
    assert!(lock.lock_fee.is_zero());
    assert_eq!(lock.unlocked_at, None);

    let release = lock_released(meta(LOCKER, 20, 0, ts + 2_600_000), 7, &owner, 500);
    assert_eq!(indexer.process(&release).await.unwrap(), Outcome::Applied);

    let lock: Lock = indexer.store().load("7").await.unwrap().unwrap();
    assert!(lock.unlocked);
    assert_eq!(lock.unlocked_at, Some(ts + 2_600_000));
    assert_eq!(lock.unlock_tx_hash.as_deref(), Some(release.meta.tx_hash.as_str()));

    let stats = global(&indexer).await;
    assert_eq!(stats.total_locks, 1);
    assert_eq!(stats.total_volume_locked, big(500));

    let user: User = indexer.store().load(&owner).await.unwrap().unwrap();
    assert_eq!(user.total_locks_created, 1);
}

#[tokio::test]
async fn two_multisends_in_one_transaction_are_distinct_rows() {
    let indexer = Indexer::new(MemoryStore::new());
    let sender = addr(0xccc);
    let ts = 1_700_000_000;

    let native = native_multisend(meta(MULTISENDER, 50, 0, ts), &sender, 1_000, 4, 1);
    let mut erc20 = erc20_multisend(meta(MULTISENDER, 50, 1, ts), &sender, &addr(0x70), 9_000, 2);
    erc20.meta.tx_hash = native.meta.tx_hash.clone();

    indexer.process(&native).await.unwrap();
    indexer.process(&erc20).await.unwrap();

    let tx = &native.meta.tx_hash;
    let rows = indexer.store().all::<MultisendTransaction>().unwrap();
    assert_eq!(rows.len(), 2);

    let first: MultisendTransaction = indexer.store().load(&format!("{tx}-0")).await.unwrap().unwrap();
    let second: MultisendTransaction = indexer.store().load(&format!("{tx}-1")).await.unwrap().unwrap();
    assert_eq!(first.transaction_type, MultisendType::Native);
    assert_eq!(first.token, None);
    assert_eq!(second.transaction_type, MultisendType::Erc20);
    assert_eq!(second.token, Some(addr(0x70)));

    let user: User = indexer.store().load(&sender).await.unwrap().unwrap();
    assert_eq!(user.total_multisends, 2);

    let stats = global(&indexer).await;
    assert_eq!(stats.total_multisends, 2);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_fees_collected, big(3));
}

#[tokio::test]
async fn every_factory_variant_is_indexed() {
    let indexer = Indexer::new(MemoryStore::new());
    let creator = addr(0xddd);
    let mut chain = Chain::default();

    for (i, token_type) in TokenType::ALL.into_iter().enumerate() {
        let factory = addr(0xf00 + i as u64);
        let token = addr(0x500 + i as u64);
        let event = token_created(chain.next(&factory, 1_000 + i as u64), token_type, &token, &creator, 7);
        assert_eq!(indexer.process(&event).await.unwrap(), Outcome::Applied);

        let record: Token = indexer.store().load(&token).await.unwrap().unwrap();
        assert_eq!(record.token_type, token_type);
        let variant = token_type.variant();
        assert_eq!(record.reward_token.is_some(), variant.has_reward_token);
        assert_eq!(record.fee_percentages.is_some(), variant.has_fee_percentages);
        let expected_fee = if variant.has_creation_fee { big(7) } else { BigInt::zero() };
        assert_eq!(record.creation_fee, expected_fee);

        let factory_stats: FactoryStats = indexer.store().load(&factory).await.unwrap().unwrap();
        assert_eq!(factory_stats.factory_type, token_type);
    }

    assert_eq!(indexer.store().count(EntityKind::FactoryStats), 6);
    let user: User = indexer.store().load(&creator).await.unwrap().unwrap();
    assert_eq!(user.total_tokens_created, 6);

    let stats = global(&indexer).await;
    assert_eq!(stats.total_tokens, 6);
    assert_eq!(stats.total_users, 1);
    // only the standard factory reports its fee
    assert_eq!(stats.total_fees_collected, big(7));
}

#[tokio::test]
async fn standard_token_uses_its_own_timestamp_for_created_at() {
    let indexer = Indexer::new(MemoryStore::new());
    let mut event = token_created(
        meta(STANDARD_FACTORY, 1, 0, 5 * DAY + 10),
        TokenType::Standard,
        &addr(0x1),
        &addr(0x2),
        0,
    );
    if let omega_core::EventPayload::TokenCreated(e) = &mut event.payload {
        e.created_at = Some(5 * DAY - 10);
    }
    indexer.process(&event).await.unwrap();

    let token: Token = indexer.store().load(&addr(0x1)).await.unwrap().unwrap();
    assert_eq!(token.created_at, 5 * DAY - 10);
    let factory: FactoryStats = indexer.store().load(STANDARD_FACTORY).await.unwrap().unwrap();
    assert_eq!(factory.last_token_created_at, 5 * DAY - 10);

    // the bucket still follows the block timestamp
    assert!(indexer.store().load::<DailyStats>("5").await.unwrap().is_some());
    assert!(indexer.store().load::<DailyStats>("4").await.unwrap().is_none());
}

#[tokio::test]
async fn factory_counts_distinct_creators() {
    let indexer = Indexer::new(MemoryStore::new());
    let mut chain = Chain::default();
    let (alice, bob) = (addr(0xa1), addr(0xb0));

    for (n, creator) in [&alice, &alice, &bob].into_iter().enumerate() {
        let event = token_created(
            chain.next(ANTIBOT_FACTORY, 1_000),
            TokenType::Antibot,
            &addr(0x900 + n as u64),
            creator,
            0,
        );
        indexer.process(&event).await.unwrap();
    }

    let factory: FactoryStats = indexer.store().load(ANTIBOT_FACTORY).await.unwrap().unwrap();
    assert_eq!(factory.total_tokens_created, 3);
    assert_eq!(factory.total_creators, 2);
    assert_eq!(indexer.store().count(EntityKind::FactoryCreator), 2);
}
