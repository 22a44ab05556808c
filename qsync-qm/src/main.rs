//! qsync-qm (Quote Manager) - Local quote collection service with remote sync
//!
//! Owns the persisted quote collection, serves the HTTP API and runs the
//! periodic remote sync loop.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use qsync_common::config::{
    load_toml_config, resolve_server_url, resolve_sync_interval_seconds, RootFolderInitializer,
    RootFolderResolver,
};
use qsync_common::db::{init::init_database, SqliteStore};
use qsync_common::store::MemoryStore;
use qsync_common::StateStore;
use qsync_qm::repository::QuoteRepository;
use qsync_qm::services::remote_client::RemoteQuoteClient;
use qsync_qm::session::SessionTracker;
use qsync_qm::sync::SyncService;
use qsync_qm::AppState;

const DEFAULT_PORT: u16 = 5731;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "qsync-qm", version, about = "Quote collection service with remote sync")]
struct Args {
    /// Root folder holding the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = load_toml_config();

    // Initialize tracing; RUST_LOG wins over the config file level
    let level = toml_config
        .logging
        .clone()
        .unwrap_or_default()
        .level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Log build identification immediately after tracing init
    info!(
        "Starting qsync-qm (Quote Manager) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Root folder and database
    let resolver = RootFolderResolver::new(args.root_folder);
    let root_folder = resolver.resolve(&toml_config);

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    let store: Arc<dyn StateStore> = Arc::new(SqliteStore::new(pool));

    // Load collection (defaults on first run or malformed state)
    let repo = Arc::new(QuoteRepository::load(store).await);
    info!(
        quotes = repo.len().await,
        filter = %repo.filter().await,
        "Quote collection loaded"
    );

    // Ephemeral session store
    let session = Arc::new(SessionTracker::new(Arc::new(MemoryStore::new())));

    // Remote sync
    let server_url = resolve_server_url(&toml_config);
    let sync_interval = resolve_sync_interval_seconds(&toml_config);
    let client = RemoteQuoteClient::new(server_url.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create remote client: {}", e))?;

    let sync = Arc::new(SyncService::new(repo.clone(), Arc::new(client)));
    sync.start_auto_sync(std::time::Duration::from_secs(sync_interval));
    info!(
        server_url = %server_url,
        interval_seconds = sync_interval,
        "Remote sync configured"
    );

    // HTTP API
    let state = AppState::new(repo, session, sync);
    let app = qsync_qm::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("qsync-qm listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
