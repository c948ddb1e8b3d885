use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::database::models::Entity;
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{Lookup, Relation, Store, StoreError};

/// PostgreSQL-backed store for one entity table.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T: Entity> Store<T> for Repository<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, StoreError> {
        let sql = QueryBuilder::<T>::select_all();
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Lookup<T>, StoreError> {
        let sql = QueryBuilder::<T>::select_by_id();
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn insert(&self, record: &T) -> Result<i64, StoreError> {
        let sql = QueryBuilder::<T>::insert();
        let row = record
            .bind_columns(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await?;
        let id: i64 = row.try_get("id")?;
        Ok(id)
    }

    async fn update(&self, record: &T) -> Result<Lookup<()>, StoreError> {
        let sql = QueryBuilder::<T>::update();
        let result = record
            .bind_columns(sqlx::query(&sql))
            .bind(record.id())
            .execute(&self.pool)
            .await?;
        Ok(affected(result.rows_affected()))
    }

    async fn delete_by_id(&self, id: i64) -> Result<Lookup<()>, StoreError> {
        let sql = QueryBuilder::<T>::delete_by_id();
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(affected(result.rows_affected()))
    }

    async fn fetch_by(&self, relation: Relation, id: i64) -> Result<Vec<T>, StoreError> {
        if !T::RELATIONS.contains(&relation) {
            return Err(StoreError::UnsupportedRelation {
                table: T::TABLE,
                relation,
            });
        }
        let sql = QueryBuilder::<T>::select_by(relation);
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

fn affected(rows: u64) -> Lookup<()> {
    if rows == 0 {
        Lookup::NotFound
    } else {
        Lookup::Found(())
    }
}
