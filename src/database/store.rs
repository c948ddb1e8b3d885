use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::Entity;

/// Outcome of a keyed store operation that may legitimately match no row.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

/// Foreign-key columns a collection can be filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Student,
    Course,
    Professor,
}

impl Relation {
    pub fn column(&self) -> &'static str {
        match self {
            Relation::Student => "student_id",
            Relation::Course => "course_id",
            Relation::Professor => "professor_id",
        }
    }

    /// Path segment used by the filtered collection routes, e.g. `/grades/student/:id`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Relation::Student => "student",
            Relation::Course => "course",
            Relation::Professor => "professor",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected the write (foreign key, not-null, unique, check).
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("{table} cannot be filtered by {relation}")]
    UnsupportedRelation {
        table: &'static str,
        relation: Relation,
    },

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            // SQLSTATE class 23: integrity constraint violation
            let constraint = db.code().map_or(false, |code| code.starts_with("23"));
            if constraint {
                return StoreError::Constraint(db.message().to_string());
            }
        }
        StoreError::Sqlx(err)
    }
}

/// CRUD access to one entity table. One instance per entity type is built at
/// start-up and shared by every request.
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// All rows in id order. No rows is an empty vec, not an error.
    async fn fetch_all(&self) -> Result<Vec<T>, StoreError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Lookup<T>, StoreError>;

    /// Persists every writable column and returns the generated id.
    async fn insert(&self, record: &T) -> Result<i64, StoreError>;

    /// Replaces every writable column of the row keyed by `record.id()`.
    async fn update(&self, record: &T) -> Result<Lookup<()>, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<Lookup<()>, StoreError>;

    /// Rows whose `relation` column equals `id`, in id order.
    async fn fetch_by(&self, relation: Relation, id: i64) -> Result<Vec<T>, StoreError>;
}
