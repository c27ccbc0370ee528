use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    db::MoodLogRepository,
    error::{AppError, AppResult},
    models::{DailyMoodStats, MoodLog, MoodType, NewMoodLog, WeeklyMoodSummary},
    services::catalog::RecipeCatalog,
};

/// Longest history `daily_stats` will report on
pub const MAX_DAILY_WINDOW: u32 = 90;

/// Records moods and summarizes a user's recent history
#[derive(Clone)]
pub struct MoodTracker {
    repo: Arc<dyn MoodLogRepository>,
}

impl MoodTracker {
    pub fn new(repo: Arc<dyn MoodLogRepository>) -> Self {
        Self { repo }
    }

    /// Stores a mood log; the recipe must exist in `catalog`
    pub async fn record(
        &self,
        entry: NewMoodLog,
        catalog: &RecipeCatalog,
        now: DateTime<Utc>,
    ) -> AppResult<MoodLog> {
        if entry.user_id.trim().is_empty() {
            return Err(AppError::InvalidInput("userId must not be empty".to_string()));
        }
        if catalog.get(entry.recipe_id).is_none() {
            return Err(AppError::NotFound(format!("Recipe {}", entry.recipe_id)));
        }

        let log = MoodLog::new(entry, now);
        self.repo.insert(&log).await?;

        tracing::info!(
            user_id = %log.user_id,
            mood = %log.mood,
            recipe_id = log.recipe_id,
            backend = self.repo.name(),
            "Mood logged"
        );

        Ok(log)
    }

    /// Summary of the seven days ending at `now`
    pub async fn weekly_summary(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<WeeklyMoodSummary> {
        let logs = self
            .repo
            .list_for_user(user_id, now - Duration::days(7), now)
            .await?;
        Ok(summarize(&logs))
    }

    /// One entry per calendar day (UTC), oldest first, ending with `now`'s day
    pub async fn daily_stats(
        &self,
        user_id: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<DailyMoodStats>> {
        if days == 0 || days > MAX_DAILY_WINDOW {
            return Err(AppError::InvalidInput(format!(
                "days must be between 1 and {}",
                MAX_DAILY_WINDOW
            )));
        }

        let today = now.date_naive();
        let first_day = today - Duration::days(i64::from(days) - 1);
        let since = first_day
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc() - Duration::nanoseconds(1))
            .ok_or_else(|| AppError::Internal("Invalid start of day".to_string()))?;

        let logs = self.repo.list_for_user(user_id, since, now).await?;
        Ok(daily_breakdown(&logs, first_day, days))
    }
}

fn empty_counts() -> BTreeMap<MoodType, u32> {
    MoodType::ALL.into_iter().map(|mood| (mood, 0)).collect()
}

/// Totals per observed mood; ties for most common go to the earlier mood type
pub fn summarize(logs: &[MoodLog]) -> WeeklyMoodSummary {
    let mut mood_counts: BTreeMap<MoodType, u32> = BTreeMap::new();
    for log in logs {
        *mood_counts.entry(log.mood).or_insert(0) += 1;
    }

    // BTreeMap iterates in declaration order, so the first maximum wins.
    let most_common_mood = mood_counts
        .iter()
        .fold(None::<(MoodType, u32)>, |best, (&mood, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((mood, count)),
        })
        .map(|(mood, _)| mood);

    WeeklyMoodSummary {
        total_logs: logs.len(),
        most_common_mood,
        mood_counts,
    }
}

/// Share of good moods, 0-100; tired and bored count half
pub fn health_score(counts: &BTreeMap<MoodType, u32>) -> u8 {
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0;
    }

    let weighted: f64 = counts
        .iter()
        .map(|(mood, &count)| mood.wellbeing_weight() * f64::from(count))
        .sum();

    (weighted / f64::from(total) * 100.0).round() as u8
}

fn daily_breakdown(logs: &[MoodLog], first_day: NaiveDate, days: u32) -> Vec<DailyMoodStats> {
    let mut per_day: BTreeMap<NaiveDate, BTreeMap<MoodType, u32>> = (0..days)
        .map(|offset| (first_day + Duration::days(i64::from(offset)), empty_counts()))
        .collect();

    for log in logs {
        if let Some(counts) = per_day.get_mut(&log.timestamp.date_naive()) {
            *counts.entry(log.mood).or_insert(0) += 1;
        }
    }

    per_day
        .into_iter()
        .map(|(date, mood_counts)| {
            let total_logs = mood_counts.values().sum::<u32>() as usize;
            DailyMoodStats {
                date,
                health_score: health_score(&mood_counts),
                mood_counts,
                total_logs,
            }
        })
        .collect()
}
