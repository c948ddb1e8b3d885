use async_trait::async_trait;

use crate::config::SecurityConfig;

/// Decides whether a username/password pair may log in. Token issuance does
/// not depend on how this is answered.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured username/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.login_username, &config.login_password)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_only_the_configured_pair() {
        let creds = StaticCredentials::new("test", "test");
        assert!(creds.verify("test", "test").await);
        assert!(!creds.verify("test", "wrong").await);
        assert!(!creds.verify("admin", "test").await);
    }
}
