//! The entity store contract, its in-memory implementation and the write set
//! that makes one event's writes land together.

use std::collections::{BTreeMap, HashMap};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::error::StoreError;
use crate::models::{Entity, EntityKind};

/// One staged upsert: entity kind, id and JSON body.
pub type Row = (EntityKind, String, Value);

/// Keyed persistence for indexed entities.
///
/// A `save` is visible to every `load` issued after it returns
/// (read-your-writes). `save_all_raw` applies its rows atomically: either all
/// of them become visible or none do.
#[allow(async_fn_in_trait)]
pub trait EntityStore {
    async fn load_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError>;

    async fn save_raw(&self, kind: EntityKind, id: &str, data: Value) -> Result<(), StoreError>;

    async fn save_all_raw(&self, rows: Vec<Row>) -> Result<(), StoreError>;

    async fn load<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        match self.load_raw(E::KIND, id).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    async fn save<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let data = serde_json::to_value(entity)?;
        self.save_raw(E::KIND, entity.id(), data).await
    }
}

/// Process-local store. Used by tests and `STORE=memory` dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<(EntityKind, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.rows.read().keys().filter(|(k, _)| *k == kind).count()
    }

    /// Every stored entity of type `E`, sorted by id.
    pub fn all<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read();
        let mut items: Vec<(&String, &Value)> = rows
            .iter()
            .filter(|((kind, _), _)| *kind == E::KIND)
            .map(|((_, id), data)| (id, data))
            .collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
            .into_iter()
            .map(|(_, data)| serde_json::from_value(data.clone()).map_err(StoreError::from))
            .collect()
    }
}

impl EntityStore for MemoryStore {
    async fn load_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.rows.read().get(&(kind, id.to_string())).cloned())
    }

    async fn save_raw(&self, kind: EntityKind, id: &str, data: Value) -> Result<(), StoreError> {
        self.rows.write().insert((kind, id.to_string()), data);
        Ok(())
    }

    async fn save_all_raw(&self, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut stored = self.rows.write();
        for (kind, id, data) in rows {
            stored.insert((kind, id), data);
        }
        Ok(())
    }
}

/// Buffers writes over a store until [`WriteSet::commit`].
///
/// Loads see the buffered rows first. Dropping the set without committing
/// discards every staged write.
#[derive(Debug)]
pub struct WriteSet<'a, S> {
    store: &'a S,
    staged: Mutex<BTreeMap<(EntityKind, String), Value>>,
}

impl<'a, S: EntityStore> WriteSet<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            staged: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.staged.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.lock().is_empty()
    }

    /// Writes every staged row in one atomic `save_all_raw`.
    pub async fn commit(self) -> Result<(), StoreError> {
        let rows: Vec<Row> = self
            .staged
            .into_inner()
            .into_iter()
            .map(|((kind, id), data)| (kind, id, data))
            .collect();
        if rows.is_empty() {
            return Ok(());
        }
        self.store.save_all_raw(rows).await
    }
}

impl<S: EntityStore> EntityStore for WriteSet<'_, S> {
    async fn load_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        let staged = self.staged.lock().get(&(kind, id.to_string())).cloned();
        match staged {
            Some(data) => Ok(Some(data)),
            None => self.store.load_raw(kind, id).await,
        }
    }

    async fn save_raw(&self, kind: EntityKind, id: &str, data: Value) -> Result<(), StoreError> {
        self.staged.lock().insert((kind, id.to_string()), data);
        Ok(())
    }

    async fn save_all_raw(&self, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut staged = self.staged.lock();
        for (kind, id, data) in rows {
            staged.insert((kind, id), data);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GlobalStats, User};

    #[tokio::test]
    async fn load_sees_previous_save() {
        let store = MemoryStore::new();
        assert!(store.load::<User>("0xabc").await.unwrap().is_none());

        let mut user = User::new("0xabc", 100);
        store.save(&user).await.unwrap();
        user.total_multisends = 4;
        store.save(&user).await.unwrap();

        let loaded = store.load::<User>("0xabc").await.unwrap().unwrap();
        assert_eq!(loaded.total_multisends, 4);
        assert_eq!(store.count(EntityKind::User), 1);
    }

    #[tokio::test]
    async fn keys_are_scoped_by_entity_kind() {
        let store = MemoryStore::new();
        store.save(&User::new("global", 1)).await.unwrap();
        assert!(store.load::<GlobalStats>("global").await.unwrap().is_none());
        assert_eq!(store.all::<User>().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn write_set_reads_its_own_writes_and_commits_together() {
        let store = MemoryStore::new();
        store.save(&User::new("0xaaa", 1)).await.unwrap();

        let staged = WriteSet::new(&store);
        let mut user = staged.load::<User>("0xaaa").await.unwrap().unwrap();
        user.total_locks_created = 3;
        staged.save(&user).await.unwrap();
        staged.save(&GlobalStats::default()).await.unwrap();

        assert_eq!(staged.len(), 2);
        assert_eq!(staged.load::<User>("0xaaa").await.unwrap().unwrap().total_locks_created, 3);
        // nothing reaches the store before commit
        assert_eq!(store.load::<User>("0xaaa").await.unwrap().unwrap().total_locks_created, 0);
        assert_eq!(store.count(EntityKind::GlobalStats), 0);

        staged.commit().await.unwrap();
        assert_eq!(store.load::<User>("0xaaa").await.unwrap().unwrap().total_locks_created, 3);
        assert_eq!(store.count(EntityKind::GlobalStats), 1);
    }

    #[tokio::test]
    async fn dropped_write_set_leaves_store_untouched() {
        let store = MemoryStore::new();
        {
            let staged = WriteSet::new(&store);
            staged.save(&User::new("0xaaa", 1)).await.unwrap();
            assert!(!staged.is_empty());
        }
        assert_eq!(store.count(EntityKind::User), 0);
    }
}
