use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::{InMemoryMoodLogRepository, KeyValueStore, MemoryStore, MoodLogRepository};
use crate::error::AppResult;
use crate::services::{MoodTracker, PreferenceStore, RecipeCatalog};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub moods: MoodTracker,
}

/// Catalog and preferences, mutated one request at a time
pub struct AppStateInner {
    pub catalog: RecipeCatalog,
    pub preferences: PreferenceStore,
}

impl AppState {
    pub fn new(
        catalog: RecipeCatalog,
        preferences: PreferenceStore,
        mood_logs: Arc<dyn MoodLogRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                catalog,
                preferences,
            })),
            moods: MoodTracker::new(mood_logs),
        }
    }

    /// Seeded catalog with volatile preference and mood storage
    pub async fn in_memory() -> AppResult<Self> {
        Self::with_storage(Arc::new(MemoryStore::new())).await
    }

    /// Seeded catalog with preferences hydrated from `storage`
    pub async fn with_storage(storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let catalog = RecipeCatalog::seeded()?;
        let preferences = PreferenceStore::load(storage).await;
        Ok(Self::new(
            catalog,
            preferences,
            Arc::new(InMemoryMoodLogRepository::new()),
        ))
    }
}
