use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Secret shipped with the development profile. Refused in production.
pub const DEFAULT_JWT_SECRET: &str = "your_secret_key";

/// Longest accepted session token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
    pub enable_request_logging: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Full connection URL; when absent one is assembled from the parts below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub auto_migrate: bool,
}

/// Which resource routes sit behind token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScope {
    /// Every `/enrollments` route.
    Enrollments,
    /// Every resource route.
    All,
}

impl FromStr for AuthScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrollments" => Ok(AuthScope::Enrollments),
            "all" => Ok(AuthScope::All),
            other => Err(ConfigError::Invalid(format!("unknown auth scope '{}'", other))),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!("unknown storage backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub login_username: String,
    pub login_password: String,
    pub auth_scope: AuthScope,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Profile defaults from `APP_ENV`, then the YAML file named by
    /// `APP_CONFIG` (or `config.yml` when present), then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = Self::for_environment(environment);

        let explicit = std::env::var("APP_CONFIG").ok();
        let path = explicit.clone().unwrap_or_else(|| "config.yml".to_string());
        if explicit.is_some() || Path::new(&path).exists() {
            let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            config = config.merge_yaml(&text)?;
        }

        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    /// Overlays a (possibly partial) YAML document onto this config.
    pub fn merge_yaml(self, text: &str) -> Result<Self, ConfigError> {
        let overlay: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mut base = serde_yaml::to_value(&self)?;
        merge_values(&mut base, overlay);
        Ok(serde_yaml::from_value(base)?)
    }

    /// Applies environment-style overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("SERVER_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }
        if let Some(v) = lookup("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_BACKEND") {
            self.database.backend = v.parse()?;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_AUTO_MIGRATE") {
            self.database.auto_migrate = v.parse().unwrap_or(self.database.auto_migrate);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_TOKEN_TTL_MINUTES") {
            self.security.token_ttl_minutes = v.parse().unwrap_or(self.security.token_ttl_minutes);
        }
        if let Some(v) = lookup("LOGIN_USERNAME") {
            self.security.login_username = v;
        }
        if let Some(v) = lookup("LOGIN_PASSWORD") {
            self.security.login_password = v;
        }
        if let Some(v) = lookup("SECURITY_AUTH_SCOPE") {
            self.security.auth_scope = v.parse()?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret must not be empty".into()));
        }
        if self.security.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid("security.token_ttl_minutes must be positive".into()));
        }
        if self.security.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "security.token_ttl_minutes must not exceed {}",
                MAX_TOKEN_TTL_MINUTES
            )));
        }
        if self.environment == Environment::Production && self.security.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be set in production".into(),
            ));
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 7777,
                max_request_size_bytes: 1024 * 1024, // 1MB
                enable_request_logging: true,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "academic_records".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                auto_migrate: true,
            },
            security: SecurityConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                token_ttl_minutes: 5,
                login_username: "test".to_string(),
                login_password: "test".to_string(),
                auth_scope: AuthScope::Enrollments,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.cors_origins = vec!["https://staging.example.com".to_string()];
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.database.auto_migrate = false;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.enable_request_logging = false;
        config.server.cors_origins = vec!["https://app.example.com".to_string()];
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.database.auto_migrate = false;
        config.security.auth_scope = AuthScope::All;
        config
    }
}

fn merge_values(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.token_ttl_minutes, 5);
        assert_eq!(config.security.auth_scope, AuthScope::Enrollments);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_secret() {
        let config = AppConfig::production();
        assert_eq!(config.security.auth_scope, AuthScope::All);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn yaml_overlay_is_partial() {
        let yaml = r#"
database:
  backend: memory
  name: registrar
security:
  auth_scope: all
"#;
        let config = AppConfig::development().merge_yaml(yaml).unwrap();
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.database.name, "registrar");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.security.auth_scope, AuthScope::All);
        assert_eq!(config.security.login_username, "test");
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("DATABASE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("SECURITY_AUTH_SCOPE", "ALL"),
            ("DB_PORT", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::development()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.auth_scope, AuthScope::All);
    }

    #[test]
    fn token_ttl_is_bounded() {
        let mut config = AppConfig::development();

        config.security.token_ttl_minutes = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.security.token_ttl_minutes = MAX_TOKEN_TTL_MINUTES + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.security.token_ttl_minutes = MAX_TOKEN_TTL_MINUTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_scope_is_an_error() {
        let result = AppConfig::development()
            .with_overrides(|key| (key == "SECURITY_AUTH_SCOPE").then(|| "admins".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
