use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::MoodLog;

/// Persistence for mood log entries
#[async_trait]
pub trait MoodLogRepository: Send + Sync {
    async fn insert(&self, log: &MoodLog) -> AppResult<()>;

    /// Logs of one user with `since < timestamp <= until`, oldest first
    async fn list_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<MoodLog>>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct InMemoryMoodLogRepository {
    logs: RwLock<Vec<MoodLog>>,
}

impl InMemoryMoodLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoodLogRepository for InMemoryMoodLogRepository {
    async fn insert(&self, log: &MoodLog) -> AppResult<()> {
        self.logs.write().await.push(log.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<MoodLog>> {
        let mut logs: Vec<MoodLog> = self
            .logs
            .read()
            .await
            .iter()
            .filter(|log| log.user_id == user_id && log.timestamp > since && log.timestamp <= until)
            .cloned()
            .collect();
        logs.sort_by_key(|log| log.timestamp);
        Ok(logs)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
