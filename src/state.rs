//! Shared application state, built once at start-up and handed to the router.

use std::sync::Arc;

use crate::auth::{CredentialVerifier, JwtError, StaticCredentials, TokenService};
use crate::config::{AppConfig, AuthScope};
use crate::database::models::{Course, Enrollment, Grade, Professor, Student};
use crate::database::{Database, Stores};
use crate::services::ResourceService;

/// Token issuance/verification plus the login credential check.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub auth_scope: AuthScope,
    pub database: Database,
    pub students: ResourceService<Student>,
    pub courses: ResourceService<Course>,
    pub professors: ResourceService<Professor>,
    pub enrollments: ResourceService<Enrollment>,
    pub grades: ResourceService<Grade>,
}

impl AppState {
    pub fn new(auth: AuthState, auth_scope: AuthScope, database: Database, stores: Stores) -> Self {
        Self {
            auth,
            auth_scope,
            database,
            students: ResourceService::new(stores.students),
            courses: ResourceService::new(stores.courses),
            professors: ResourceService::new(stores.professors),
            enrollments: ResourceService::new(stores.enrollments),
            grades: ResourceService::new(stores.grades),
        }
    }

    /// Wires every component from configuration. Stores are created here and
    /// nowhere else.
    pub fn from_config(config: &AppConfig, database: Database) -> Result<Self, JwtError> {
        let auth = AuthState {
            tokens: Arc::new(TokenService::from_config(&config.security)?),
            credentials: Arc::new(StaticCredentials::from_config(&config.security)),
        };
        let stores = database.stores();
        Ok(Self::new(auth, config.security.auth_scope, database, stores))
    }
}
