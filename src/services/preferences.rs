use std::sync::Arc;

use crate::{
    db::KeyValueStore,
    models::{PreferenceFlag, PreferencesPatch, UserPreferences},
};

/// Current preference flags, mirrored to durable storage
///
/// Every change re-writes all flags (write-through). Storage failures are
/// logged and never roll back or fail the in-memory change.
pub struct PreferenceStore {
    preferences: UserPreferences,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("preferences", &self.preferences)
            .field("storage", &self.storage.name())
            .finish()
    }
}

/// Only the exact string "true" reads as set
fn decode(value: Option<&str>) -> bool {
    value == Some("true")
}

fn encode(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl PreferenceStore {
    /// Hydrates the flags from storage
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let preferences = Self::read_all(storage.as_ref()).await;
        tracing::info!(
            backend = storage.name(),
            active = ?preferences.active_flags(),
            "Preferences loaded"
        );
        Self {
            preferences,
            storage,
        }
    }

    async fn read_all(storage: &dyn KeyValueStore) -> UserPreferences {
        let mut preferences = UserPreferences::new();
        for flag in PreferenceFlag::ALL {
            let value = match storage.get(flag.key()).await {
                Ok(value) => decode(value.as_deref()),
                Err(e) => {
                    tracing::warn!(flag = %flag, error = %e, "Failed to read preference, using default");
                    false
                }
            };
            preferences.set(flag, value);
        }
        preferences
    }

    pub fn preferences(&self) -> UserPreferences {
        self.preferences
    }

    pub fn get(&self, flag: PreferenceFlag) -> bool {
        self.preferences.get(flag)
    }

    /// Sets one flag and flushes if it changed
    pub async fn set(&mut self, flag: PreferenceFlag, value: bool) -> UserPreferences {
        if self.preferences.set(flag, value) {
            self.flush().await;
        }
        self.preferences
    }

    /// Inverts one flag and flushes
    pub async fn toggle(&mut self, flag: PreferenceFlag) -> UserPreferences {
        let value = !self.preferences.get(flag);
        self.set(flag, value).await
    }

    /// Applies several changes with a single flush
    pub async fn apply(&mut self, patch: PreferencesPatch) -> UserPreferences {
        let mut changed = false;
        for (flag, value) in patch.changes() {
            changed |= self.preferences.set(flag, value);
        }
        if changed {
            self.flush().await;
        }
        self.preferences
    }

    /// Re-reads every flag from storage, discarding the in-memory state
    pub async fn reload(&mut self) -> UserPreferences {
        self.preferences = Self::read_all(self.storage.as_ref()).await;
        self.preferences
    }

    /// Writes every flag in one batch
    async fn flush(&self) {
        let entries: Vec<(String, String)> = PreferenceFlag::ALL
            .into_iter()
            .map(|flag| {
                let value = encode(self.preferences.get(flag));
                (flag.key().to_string(), value.to_string())
            })
            .collect();

        match self.storage.set_many(&entries).await {
            Ok(()) => tracing::debug!(backend = self.storage.name(), "Preferences persisted"),
            Err(e) => tracing::error!(
                backend = self.storage.name(),
                error = %e,
                "Failed to persist preferences"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::storage::MockKeyValueStore;
    use crate::db::MemoryStore;
    use crate::error::AppError;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_untouched_flags_default_to_false() {
        let store = PreferenceStore::load(memory()).await;
        assert_eq!(store.preferences(), UserPreferences::new());
    }

    #[test]
    fn test_load_outside_runtime() {
        let store = tokio_test::block_on(PreferenceStore::load(memory()));
        assert!(!store.get(PreferenceFlag::ShellfishAllergy));
    }

    #[tokio::test]
    async fn test_set_survives_reload() {
        let storage = memory();
        for flag in PreferenceFlag::ALL {
            let mut store = PreferenceStore::load(storage.clone()).await;
            store.set(flag, true).await;

            let reloaded = PreferenceStore::load(storage.clone()).await;
            assert!(reloaded.get(flag), "{} did not persist", flag);

            let mut store = reloaded;
            store.set(flag, false).await;
        }
    }

    #[tokio::test]
    async fn test_flush_writes_every_flag() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = PreferenceStore::load(storage.clone()).await;
        store.set(PreferenceFlag::Halal, true).await;

        for flag in PreferenceFlag::ALL {
            let expected = if flag == PreferenceFlag::Halal { "true" } else { "false" };
            assert_eq!(
                storage.get(flag.key()).await.unwrap().as_deref(),
                Some(expected)
            );
        }
    }

    #[tokio::test]
    async fn test_non_boolean_values_read_as_false() {
        let storage = Arc::new(MemoryStore::new());
        storage.set("isVegan", "yes").await.unwrap();
        storage.set("isHalal", "TRUE").await.unwrap();
        storage.set("hasEggAllergy", "true").await.unwrap();

        let store = PreferenceStore::load(storage).await;
        assert!(!store.get(PreferenceFlag::Vegan));
        assert!(!store.get(PreferenceFlag::Halal));
        assert!(store.get(PreferenceFlag::EggAllergy));
    }

    #[tokio::test]
    async fn test_toggle_and_apply() {
        let mut store = PreferenceStore::load(memory()).await;

        let prefs = store.toggle(PreferenceFlag::NutAllergy).await;
        assert!(prefs.has_nut_allergy);

        let prefs = store
            .apply(PreferencesPatch {
                has_nut_allergy: Some(false),
                is_vegetarian: Some(true),
                ..Default::default()
            })
            .await;
        assert!(!prefs.has_nut_allergy);
        assert!(prefs.is_vegetarian);

        let prefs = store.reload().await;
        assert!(prefs.is_vegetarian);
        assert!(!prefs.has_nut_allergy);
    }

    #[tokio::test]
    async fn test_unchanged_value_does_not_flush() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set_many().never();
        mock.expect_set().never();
        mock.expect_name().return_const("mock");

        let mut store = PreferenceStore::load(Arc::new(mock)).await;
        store.set(PreferenceFlag::Vegan, false).await;
        store.apply(PreferencesPatch::default()).await;
    }

    #[tokio::test]
    async fn test_change_flushes_all_flags_once() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set_many()
            .withf(|entries: &[(String, String)]| {
                entries.len() == PreferenceFlag::ALL.len()
                    && entries
                        .iter()
                        .all(|(key, value)| (key == "isGlutenFree") == (value == "true"))
            })
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_set().never();
        mock.expect_name().return_const("mock");

        let mut store = PreferenceStore::load(Arc::new(mock)).await;
        store.set(PreferenceFlag::GlutenFree, true).await;
    }

    #[tokio::test]
    async fn test_apply_writes_one_batch() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set_many()
            .withf(|entries: &[(String, String)]| {
                entries.iter().filter(|(_, value)| value == "true").count() == 3
            })
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_name().return_const("mock");

        let mut store = PreferenceStore::load(Arc::new(mock)).await;
        store
            .apply(PreferencesPatch {
                is_vegan: Some(true),
                has_fish_allergy: Some(true),
                has_shellfish_allergy: Some(true),
                ..Default::default()
            })
            .await;
    }

    #[tokio::test]
    async fn test_storage_failures_are_tolerated() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(AppError::Storage("unavailable".to_string())));
        mock.expect_set_many()
            .times(1)
            .returning(|_| Err(AppError::Storage("unavailable".to_string())));
        mock.expect_name().return_const("mock");

        let mut store = PreferenceStore::load(Arc::new(mock)).await;
        assert_eq!(store.preferences(), UserPreferences::new());

        let prefs = store.set(PreferenceFlag::Vegan, true).await;
        assert!(prefs.is_vegan);
        assert!(store.get(PreferenceFlag::Vegan));
    }
}
