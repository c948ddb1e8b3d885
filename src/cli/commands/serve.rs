use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;
use crate::router;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let database = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.auto_migrate {
        database.migrate().await.context("failed to apply schema")?;
    }

    let state = AppState::from_config(&config, database.clone())?;
    let app = router::app(state, &config.server);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
