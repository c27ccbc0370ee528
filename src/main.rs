use std::sync::Arc;

use mealmood::{
    api::{create_router, AppState},
    cloud::CloudApp,
    config::{Config, StorageBackend},
    db::{
        create_lazy_pool, create_redis_client, FileStore, InMemoryMoodLogRepository, KeyValueStore, MemoryStore,
        MoodLogRepository, PgMoodLogRepository, RedisStore,
    },
    services::{PreferenceStore, RecipeCatalog},
};
use tracing_subscriber::EnvFilter;

async fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let storage: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::open(&config.preferences_path).await?),
        StorageBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            Arc::new(RedisStore::new(client).await?)
        }
    };
    Ok(storage)
}

/// `DATABASE_URL` wins over the cloud database; with neither, logs stay in memory
async fn open_mood_logs(
    config: &Config,
    cloud: Option<&CloudApp>,
) -> anyhow::Result<Arc<dyn MoodLogRepository>> {
    let pool = match config.database_url.as_deref() {
        Some(url) => Some(create_lazy_pool(url)?),
        None => cloud.and_then(CloudApp::database).cloned(),
    };

    match pool {
        Some(pool) => {
            sqlx::migrate!("./migrations").run(&pool).await?;
            Ok(Arc::new(PgMoodLogRepository::new(pool)))
        }
        None => Ok(Arc::new(InMemoryMoodLogRepository::new())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mealmood=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let cloud = match Config::cloud_from_env() {
        Ok(cloud_config) => Some(CloudApp::initialize(cloud_config)?),
        Err(e) => {
            tracing::warn!(error = %e, "Cloud app not configured, running locally");
            None
        }
    };

    let storage = open_storage(&config).await?;
    let preferences = PreferenceStore::load(storage).await;
    let catalog = RecipeCatalog::seeded()?;
    let mood_logs = open_mood_logs(&config, cloud.as_ref()).await?;

    tracing::info!(
        recipes = catalog.len(),
        storage = ?config.storage_backend,
        mood_log = mood_logs.name(),
        "Application state ready"
    );

    let state = AppState::new(catalog, preferences, mood_logs);
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
