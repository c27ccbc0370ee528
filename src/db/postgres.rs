use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::db::mood_logs::MoodLogRepository;
use crate::error::{AppError, AppResult};
use crate::models::{MoodLog, RecipeId};

/// Creates a PostgreSQL connection pool that connects on first use
pub fn create_lazy_pool(database_url: &str) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct MoodLogRow {
    id: Uuid,
    user_id: String,
    mood: String,
    recipe_id: i32,
    logged_at: DateTime<Utc>,
}

impl TryFrom<MoodLogRow> for MoodLog {
    type Error = AppError;

    fn try_from(row: MoodLogRow) -> Result<Self, Self::Error> {
        let recipe_id = RecipeId::try_from(row.recipe_id)
            .map_err(|_| AppError::Internal(format!("Negative recipe id {}", row.recipe_id)))?;

        Ok(MoodLog {
            id: row.id,
            user_id: row.user_id,
            mood: row.mood.parse()?,
            recipe_id,
            timestamp: row.logged_at,
        })
    }
}

/// Mood log stored in the `mood_logs` table
#[derive(Clone)]
pub struct PgMoodLogRepository {
    pool: PgPool,
}

impl PgMoodLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MoodLogRepository for PgMoodLogRepository {
    async fn insert(&self, log: &MoodLog) -> AppResult<()> {
        let recipe_id = i32::try_from(log.recipe_id)
            .map_err(|_| AppError::InvalidInput(format!("Recipe id {} out of range", log.recipe_id)))?;

        sqlx::query(
            "INSERT INTO mood_logs (id, user_id, mood, recipe_id, logged_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(log.id)
        .bind(&log.user_id)
        .bind(log.mood.as_str())
        .bind(recipe_id)
        .bind(log.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<MoodLog>> {
        let rows = sqlx::query_as::<_, MoodLogRow>(
            "SELECT id, user_id, mood, recipe_id, logged_at FROM mood_logs \
             WHERE user_id = $1 AND logged_at > $2 AND logged_at <= $3 \
             ORDER BY logged_at",
        )
        .bind(user_id)
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MoodLog::try_from).collect()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
