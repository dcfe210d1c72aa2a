//! Roster Daemon - Main Entry Point
//! Serves employee and role CRUD over JSON-RPC, backed by SQLite.

mod config;
mod logging;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use config::DaemonConfig;
use roster_api_rpc::handler::EntityHandler;
use roster_api_rpc::RpcServer;
use roster_core::application::EntityService;
use roster_core::domain::EntityKind;
use roster_core::port::time_provider::SystemTimeProvider;
use roster_core::port::{RuleValidator, TimeProvider, Validator};
use roster_infra_sqlite::{create_pool, run_migrations, SqliteEntityRepository, SqlitePool};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration and initialize logging
    let config = DaemonConfig::from_env()?;
    let _log_guard = logging::init(&config)?;

    info!("Roster daemon v{} starting...", roster_core::VERSION);

    // 2. Initialize database
    if !config.is_in_memory() {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    info!(db_path = %config.db_path, "Initializing database...");

    let pool = create_pool(&config.db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 3. Setup dependencies (DI wiring)
    let validator: Arc<dyn Validator> = Arc::new(RuleValidator);
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

    let employees = entity_handler(&pool, &validator, &time_provider);
    let roles = entity_handler(&pool, &validator, &time_provider);

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc.clone(), employees, roles);
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .context("RPC server start failed")?;

    info!(%addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}

fn entity_handler<K: EntityKind>(
    pool: &SqlitePool,
    validator: &Arc<dyn Validator>,
    time_provider: &Arc<dyn TimeProvider>,
) -> Arc<EntityHandler<K>> {
    let repo = Arc::new(SqliteEntityRepository::<K>::new(pool.clone()));
    let service = EntityService::new(
        repo.clone(),
        repo,
        validator.clone(),
        time_provider.clone(),
    );
    Arc::new(EntityHandler::new(Arc::new(service)))
}
