use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::db::storage::KeyValueStore;
use crate::error::AppResult;

/// Namespaced Redis key for a stored entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum StorageKey {
    Preference(String),
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::Preference(name) => write!(f, "prefs:{}", name),
        }
    }
}

/// Creates a Redis client for preference storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Preference storage in Redis
///
/// Entries are written without a TTL. The connection manager reconnects on
/// its own after the server drops the connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn new(redis_client: Client) -> AppResult<Self> {
        let conn = redis_client.get_connection_manager().await?;
        tracing::info!("Redis preference store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let key = StorageKey::Preference(key.to_string());
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key.to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, key = %key, "Redis get failed");
            e
        })?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let key = StorageKey::Preference(key.to_string());
        let mut conn = self.conn.clone();
        let _: () = conn.set(key.to_string(), value).await?;
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let items: Vec<(String, &str)> = entries
            .iter()
            .map(|(key, value)| {
                (
                    StorageKey::Preference(key.clone()).to_string(),
                    value.as_str(),
                )
            })
            .collect();
        let mut conn = self.conn.clone();
        let _: () = conn.mset(&items).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display_preference() {
        let key = StorageKey::Preference("isVegan".to_string());
        assert_eq!(format!("{}", key), "prefs:isVegan");
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not-a-redis-url").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_redis_store_round_trip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let store = RedisStore::new(client.clone()).await.unwrap();

        store.set("test_round_trip", "true").await.unwrap();
        assert_eq!(
            store.get("test_round_trip").await.unwrap(),
            Some("true".to_string())
        );
        assert_eq!(store.get("test_never_written").await.unwrap(), None);

        let entries = vec![
            ("test_batch_a".to_string(), "true".to_string()),
            ("test_batch_b".to_string(), "false".to_string()),
        ];
        store.set_many(&entries).await.unwrap();
        assert_eq!(
            store.get("test_batch_b").await.unwrap(),
            Some("false".to_string())
        );

        // Clean up
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn
            .del(&["prefs:test_round_trip", "prefs:test_batch_a", "prefs:test_batch_b"])
            .await
            .unwrap();
    }
}
