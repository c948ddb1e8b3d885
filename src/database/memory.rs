use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::Entity;
use crate::database::store::{Lookup, Relation, Store, StoreError};

/// In-process store used by the `memory` backend and the integration tests.
/// Ids are assigned from a per-table sequence starting at 1 and never reused.
pub struct MemoryStore<T> {
    state: RwLock<MemoryTable<T>>,
}

struct MemoryTable<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, StoreError> {
        let table = self.state.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Lookup<T>, StoreError> {
        let table = self.state.read().await;
        Ok(table.rows.get(&id).cloned().into())
    }

    async fn insert(&self, record: &T) -> Result<i64, StoreError> {
        let mut table = self.state.write().await;
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, record.clone().with_id(id));
        Ok(id)
    }

    async fn update(&self, record: &T) -> Result<Lookup<()>, StoreError> {
        let mut table = self.state.write().await;
        match table.rows.get_mut(&record.id()) {
            Some(row) => {
                *row = record.clone();
                Ok(Lookup::Found(()))
            }
            None => Ok(Lookup::NotFound),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<Lookup<()>, StoreError> {
        let mut table = self.state.write().await;
        Ok(table.rows.remove(&id).map(|_| ()).into())
    }

    async fn fetch_by(&self, relation: Relation, id: i64) -> Result<Vec<T>, StoreError> {
        if !T::RELATIONS.contains(&relation) {
            return Err(StoreError::UnsupportedRelation {
                table: T::TABLE,
                relation,
            });
        }
        let table = self.state.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| row.relation_id(relation) == Some(id))
            .cloned()
            .collect())
    }
}
