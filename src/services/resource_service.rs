use std::sync::Arc;

use thiserror::Error;

use crate::database::models::Entity;
use crate::database::store::{Lookup, Relation, Store, StoreError};
use crate::services::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Converts an external identifier into a store id.
pub fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::InvalidIdentifier(raw.to_string()))
}

/// Orchestration for one resource: identifier parsing, write validation, and
/// delegation to the store. Identifier and validation failures never reach the
/// store.
pub struct ResourceService<T: Entity> {
    store: Arc<dyn Store<T>>,
}

impl<T: Entity> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Entity> ResourceService<T> {
    pub fn new(store: Arc<dyn Store<T>>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.store.fetch_all().await?)
    }

    pub async fn get(&self, id: &str) -> Result<T, ServiceError> {
        let id = parse_id(id)?;
        match self.store.fetch_by_id(id).await? {
            Lookup::Found(record) => Ok(record),
            Lookup::NotFound => Err(Self::not_found(id)),
        }
    }

    pub async fn create(&self, input: T::Input) -> Result<T, ServiceError> {
        let record = T::from_input(input)?;
        let id = self.store.insert(&record).await?;
        Ok(record.with_id(id))
    }

    /// Full replace of every writable field; the id comes from the path only.
    pub async fn update(&self, id: &str, input: T::Input) -> Result<T, ServiceError> {
        let id = parse_id(id)?;
        let record = T::from_input(input)?.with_id(id);
        match self.store.update(&record).await? {
            Lookup::Found(()) => Ok(record),
            Lookup::NotFound => Err(Self::not_found(id)),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        match self.store.delete_by_id(id).await? {
            Lookup::Found(()) => Ok(()),
            Lookup::NotFound => Err(Self::not_found(id)),
        }
    }

    pub async fn list_by(&self, relation: Relation, id: &str) -> Result<Vec<T>, ServiceError> {
        let id = parse_id(id)?;
        if !T::RELATIONS.contains(&relation) {
            return Err(StoreError::UnsupportedRelation {
                table: T::TABLE,
                relation,
            }
            .into());
        }
        Ok(self.store.fetch_by(relation, id).await?)
    }

    fn not_found(id: i64) -> ServiceError {
        ServiceError::NotFound {
            resource: T::NAME,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::{Grade, GradeInput, Student, StudentInput};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts every store call and forwards to an in-memory table.
    struct RecordingStore<T> {
        calls: AtomicUsize,
        inner: MemoryStore<T>,
    }

    impl<T: Entity> RecordingStore<T> {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                inner: MemoryStore::new(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl<T: Entity> Store<T> for RecordingStore<T> {
        async fn fetch_all(&self) -> Result<Vec<T>, StoreError> {
            self.hit();
            self.inner.fetch_all().await
        }

        async fn fetch_by_id(&self, id: i64) -> Result<Lookup<T>, StoreError> {
            self.hit();
            self.inner.fetch_by_id(id).await
        }

        async fn insert(&self, record: &T) -> Result<i64, StoreError> {
            self.hit();
            self.inner.insert(record).await
        }

        async fn update(&self, record: &T) -> Result<Lookup<()>, StoreError> {
            self.hit();
            self.inner.update(record).await
        }

        async fn delete_by_id(&self, id: i64) -> Result<Lookup<()>, StoreError> {
            self.hit();
            self.inner.delete_by_id(id).await
        }

        async fn fetch_by(&self, relation: Relation, id: i64) -> Result<Vec<T>, StoreError> {
            self.hit();
            self.inner.fetch_by(relation, id).await
        }
    }

    fn ana() -> StudentInput {
        StudentInput {
            name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            date_of_birth: Some("2000-01-01".into()),
            address: Some("Main St".into()),
            email: Some("ana@x.com".into()),
        }
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_store() {
        let store = RecordingStore::<Student>::new();
        let service = ResourceService::<Student>::new(store.clone());

        let mut input = ana();
        input.email = None;
        let err = service.create(input).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref v) if v.fields == vec!["email"]));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_update_never_reaches_store() {
        let store = RecordingStore::<Grade>::new();
        let service = ResourceService::<Grade>::new(store.clone());

        let err = service.update("1", GradeInput::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn bad_identifier_short_circuits() {
        let store = RecordingStore::<Student>::new();
        let service = ResourceService::<Student>::new(store.clone());

        assert!(matches!(service.get("abc").await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(service.delete("1.5").await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(service.update("", ana()).await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(
            service.list_by(Relation::Student, "x").await,
            Err(ServiceError::InvalidIdentifier(_))
        ));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = ResourceService::<Student>::new(RecordingStore::<Student>::new());

        let created = service.create(ana()).await.unwrap();
        assert!(created.id > 0);

        let fetched = service.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_keeps_path_id() {
        let service = ResourceService::<Student>::new(RecordingStore::<Student>::new());
        let created = service.create(ana()).await.unwrap();

        let mut input = ana();
        input.address = Some("Second Ave".into());
        let updated = service.update(&created.id.to_string(), input).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(service.get(&created.id.to_string()).await.unwrap().address, "Second Ave");
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let service = ResourceService::<Student>::new(RecordingStore::<Student>::new());

        for result in [
            service.get("999999").await.map(|_| ()),
            service.update("999999", ana()).await.map(|_| ()),
            service.delete("999999").await,
        ] {
            assert!(matches!(
                result,
                Err(ServiceError::NotFound { resource: "student", id: 999999 })
            ));
        }
    }

    #[tokio::test]
    async fn unsupported_relation_is_refused_before_store() {
        let store = RecordingStore::<Student>::new();
        let service = ResourceService::<Student>::new(store.clone());

        let err = service.list_by(Relation::Course, "1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::UnsupportedRelation { .. })));
        assert_eq!(store.calls(), 0);
    }
}
