//! Walk-in Queue Service - Main Entry Point

mod settings;

use anyhow::{Context, Result};
use settings::{DaemonSettings, LogFormat};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use walkin_api_rpc::RpcServer;
use walkin_core::application::QueueService;
use walkin_core::port::id_provider::UuidProvider;
use walkin_core::port::time_provider::SystemTimeProvider;
use walkin_core::port::{JsonCodeRenderer, LogNotifier};
use walkin_infra_sqlite::{create_pool, run_migrations, SqliteQueueStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("walkin=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let settings = DaemonSettings::from_env()?;
    init_logging(settings.log_format)?;

    info!("Walk-in queue service v{} starting...", VERSION);

    // 2. Database
    if let Some(dir) = Path::new(&settings.db_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    info!(db_path = %settings.db_path, "Initializing database...");
    let pool = create_pool(&settings.db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 3. Wiring
    let service = Arc::new(QueueService::new(
        Arc::new(SqliteQueueStore::new(pool.clone())),
        Arc::new(LogNotifier),
        Arc::new(JsonCodeRenderer),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        settings.service.clone(),
    ));

    // 4. JSON-RPC server
    let server = RpcServer::new(settings.rpc.clone(), service)
        .start()
        .await
        .context("RPC server start failed")?;

    info!(
        addr = %server.addr,
        join_policy = ?settings.service.emergency_join_policy,
        "System ready"
    );
    info!("Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");
    server
        .handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    server.handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}
