#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use academic_records::config::{AppConfig, AuthScope, StorageBackend};
use academic_records::database::Database;
use academic_records::{router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// An in-process server on its own port with a fresh in-memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn spawn(auth_scope: AuthScope) -> Result<Self> {
        let mut config = AppConfig::development();
        config.database.backend = StorageBackend::Memory;
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.security.auth_scope = auth_scope;
        config.server.enable_request_logging = false;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let database = Database::connect(&config.database).await?;
        let state = AppState::from_config(&config, database)?;
        let app = router::app(state, &config.server);

        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Logs in with the default development credentials.
    pub async fn token(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": "test", "password": "test" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response missing token")
    }

    /// POSTs `payload` and returns the created record, asserting 201.
    pub async fn create(&self, path: &str, payload: Value, token: Option<&str>) -> Result<Value> {
        let mut req = self.client.post(self.url(path)).json(&payload);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create {} returned {}: {}", path, status, body);
        Ok(body)
    }
}

/// Starts a server that protects only `/enrollments`.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with_scope(AuthScope::Enrollments).await
}

pub async fn spawn_server_with_scope(auth_scope: AuthScope) -> Result<TestServer> {
    let server = TestServer::spawn(auth_scope).await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

pub fn student(name: &str) -> Value {
    json!({
        "name": name,
        "last_name": "Ruiz",
        "date_of_birth": "2000-01-01",
        "address": "Main St 1",
        "email": format!("{}@example.com", name.to_lowercase()),
    })
}

pub fn course(name: &str) -> Value {
    json!({ "name": name, "description": format!("{} fundamentals", name) })
}

pub fn professor(name: &str) -> Value {
    json!({
        "name": name,
        "last_name": "Turing",
        "email": format!("{}@example.edu", name.to_lowercase()),
        "specialization": "Computability",
    })
}
