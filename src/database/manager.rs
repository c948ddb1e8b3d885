use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::memory::MemoryStore;
use crate::database::models::{Course, Enrollment, Grade, Professor, Student};
use crate::database::repository::Repository;
use crate::database::store::Store;

/// Errors from connecting to or preparing the backing store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Table definitions, applied in order. No foreign keys are declared:
/// referenced ids in enrollments and grades are not checked.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS "students" (
        "id" BIGSERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "last_name" TEXT NOT NULL,
        "date_of_birth" TEXT NOT NULL,
        "address" TEXT NOT NULL,
        "email" TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "courses" (
        "id" BIGSERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "description" TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "professors" (
        "id" BIGSERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "last_name" TEXT NOT NULL,
        "email" TEXT NOT NULL,
        "specialization" TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "enrollments" (
        "id" BIGSERIAL PRIMARY KEY,
        "student_id" BIGINT NOT NULL,
        "course_id" BIGINT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "grades" (
        "id" BIGSERIAL PRIMARY KEY,
        "student_id" BIGINT NOT NULL,
        "course_id" BIGINT NOT NULL,
        "professor_id" BIGINT NOT NULL,
        "grade" DOUBLE PRECISION NOT NULL
    )"#,
];

/// The process-wide backing store. Built once at start-up; cloning shares the
/// same pool.
#[derive(Clone)]
pub enum Database {
    Postgres(PgPool),
    Memory,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage backend");
                Ok(Database::Memory)
            }
            StorageBackend::Postgres => {
                let connection_string = build_connection_string(config)?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect(&connection_string)
                    .await?;
                info!(
                    "Created database pool for {}:{}/{}",
                    config.host, config.port, config.name
                );
                Ok(Database::Postgres(pool))
            }
        }
    }

    /// Creates any missing tables. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        if let Database::Postgres(pool) = self {
            for ddl in SCHEMA {
                sqlx::query(ddl).execute(pool).await?;
            }
            info!("Database schema is up to date");
        }
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        if let Database::Postgres(pool) = self {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// Builds one store per entity. Call once: memory stores start empty.
    pub fn stores(&self) -> Stores {
        match self {
            Database::Postgres(pool) => Stores {
                students: Arc::new(Repository::<Student>::new(pool.clone())),
                courses: Arc::new(Repository::<Course>::new(pool.clone())),
                professors: Arc::new(Repository::<Professor>::new(pool.clone())),
                enrollments: Arc::new(Repository::<Enrollment>::new(pool.clone())),
                grades: Arc::new(Repository::<Grade>::new(pool.clone())),
            },
            Database::Memory => Stores::memory(),
        }
    }

    pub async fn close(&self) {
        if let Database::Postgres(pool) = self {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

/// One shared store per resource type.
#[derive(Clone)]
pub struct Stores {
    pub students: Arc<dyn Store<Student>>,
    pub courses: Arc<dyn Store<Course>>,
    pub professors: Arc<dyn Store<Professor>>,
    pub enrollments: Arc<dyn Store<Enrollment>>,
    pub grades: Arc<dyn Store<Grade>>,
}

impl Stores {
    pub fn memory() -> Self {
        Self {
            students: Arc::new(MemoryStore::<Student>::new()),
            courses: Arc::new(MemoryStore::<Course>::new()),
            professors: Arc::new(MemoryStore::<Professor>::new()),
            enrollments: Arc::new(MemoryStore::<Enrollment>::new()),
            grades: Arc::new(MemoryStore::<Grade>::new()),
        }
    }
}

/// Uses `database.url` verbatim when set, otherwise assembles a postgres URL
/// from the host/port/user/password/name parts.
pub fn build_connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
    if let Some(url) = &config.url {
        url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        return Ok(url.clone());
    }

    if config.host.is_empty() {
        return Err(DatabaseError::ConfigMissing("database.host"));
    }
    if config.name.is_empty() {
        return Err(DatabaseError::ConfigMissing("database.name"));
    }

    let mut url = url::Url::parse(&format!("postgres://{}", config.host))
        .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    url.set_port(Some(config.port))
        .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if !config.user.is_empty() {
        url.set_username(&config.user)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    if !config.password.is_empty() {
        url.set_password(Some(&config.password))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    url.set_path(&format!("/{}", config.name));
    Ok(url.into())
}
