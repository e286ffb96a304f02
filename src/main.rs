use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filespace::config::Config;
use filespace::db::Database;
use filespace::index::FileIndex;
use filespace::storage::{LinkSigner, LocalStore, ObjectStore};
use filespace::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filespace=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting filespace...");

    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize metadata index
    let db = Database::new(&config.database.path).await?;
    let index = FileIndex::new(db);
    index.ensure_table().await?;

    // Initialize object store
    let store: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(&config.storage));
    store.ensure_container().await?;
    tracing::info!("Object store ready ({})", store.store_type());

    let signer = Arc::new(LinkSigner::new(&config.storage.link_secret));

    // Create app state
    let state = AppState {
        index,
        config: config.clone(),
        store,
        signer,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
