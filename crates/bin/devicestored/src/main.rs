//! # devicestored — devicestore daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Open the `PostgreSQL` pool and create the schema, or pick the in-memory store
//! - Construct the repository, the service, and the axum router
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT) with a bounded drain period
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod shutdown;

use std::error::Error;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use devicestore_adapter_http_axum::router;
use devicestore_adapter_http_axum::state::AppState;
use devicestore_adapter_storage_memory::InMemoryDeviceRepository;
use devicestore_adapter_storage_postgres_sqlx::{Database, PostgresDeviceRepository, StorageError};
use devicestore_app::ports::DeviceRepository;
use devicestore_app::services::device_service::DeviceService;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.logging.filter)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let shutdown = shutdown::on_signal();

    match config.storage_backend() {
        StorageBackend::Postgres(url) => {
            let Some(db) = connect(url, config.database.max_connections, &shutdown).await? else {
                tracing::info!("shutdown requested before the database was ready");
                return Ok(());
            };
            tracing::info!("connected to postgres");

            let repo = PostgresDeviceRepository::new(db.pool().clone());
            let result = serve(&config, repo, shutdown).await;

            db.close().await;
            tracing::info!("database pool closed");
            result
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data will not survive a restart");
            serve(&config, InMemoryDeviceRepository::new(), shutdown).await
        }
    }
}

/// Open the pool, giving up early when `shutdown` fires while connecting.
async fn connect(
    url: &str,
    max_connections: u32,
    shutdown: &CancellationToken,
) -> Result<Option<Database>, StorageError> {
    let build = devicestore_adapter_storage_postgres_sqlx::Config {
        database_url: url.to_string(),
        max_connections,
    }
    .build();

    tokio::select! {
        biased;
        () = shutdown.cancelled() => Ok(None),
        db = build => db.map(Some),
    }
}

/// Serve the API until `shutdown` is cancelled, then drain in-flight requests
/// for at most the configured grace period.
async fn serve<DR>(
    config: &Config,
    repo: DR,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn Error>>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let app = router::build(AppState::new(DeviceService::new(repo)));

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %listener.local_addr()?, "devicestored listening");

    let graceful =
        axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let mut server = tokio::spawn(async move { graceful.await });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        () = shutdown.cancelled() => {}
    }

    tracing::info!("shutdown requested, draining in-flight requests");
    if let Ok(result) = tokio::time::timeout(config.shutdown_grace(), &mut server).await {
        result??;
        tracing::info!("server closed");
    } else {
        tracing::warn!(
            grace_secs = config.server.shutdown_grace_secs,
            "grace period elapsed, abandoning in-flight requests"
        );
        server.abort();
    }

    Ok(())
}
