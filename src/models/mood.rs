use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

use super::RecipeId;
use crate::error::AppError;

/// Moods a user can report; declaration order breaks ties in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MoodType {
    Happy,
    Sad,
    Angry,
    Tired,
    Stressed,
    Bored,
}

impl MoodType {
    pub const ALL: [MoodType; 6] = [
        MoodType::Happy,
        MoodType::Sad,
        MoodType::Angry,
        MoodType::Tired,
        MoodType::Stressed,
        MoodType::Bored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodType::Happy => "Happy",
            MoodType::Sad => "Sad",
            MoodType::Angry => "Angry",
            MoodType::Tired => "Tired",
            MoodType::Stressed => "Stressed",
            MoodType::Bored => "Bored",
        }
    }

    /// Weight of the mood in the daily health score
    pub fn wellbeing_weight(&self) -> f64 {
        match self {
            MoodType::Happy => 1.0,
            MoodType::Tired | MoodType::Bored => 0.5,
            MoodType::Sad | MoodType::Angry | MoodType::Stressed => 0.0,
        }
    }
}

impl Display for MoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MoodType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MoodType::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown mood: {}", s)))
    }
}

/// Accepts any casing, same as `FromStr`
impl<'de> Deserialize<'de> for MoodType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A mood reported alongside the recipe the user picked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: Uuid,
    pub user_id: String,
    pub mood: MoodType,
    pub recipe_id: RecipeId,
    pub timestamp: DateTime<Utc>,
}

/// Request body for recording a mood
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMoodLog {
    pub user_id: String,
    pub mood: MoodType,
    pub recipe_id: RecipeId,
}

impl MoodLog {
    pub fn new(entry: NewMoodLog, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            mood: entry.mood,
            recipe_id: entry.recipe_id,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMoodSummary {
    pub total_logs: usize,
    pub most_common_mood: Option<MoodType>,
    /// Only moods that were actually logged appear here
    pub mood_counts: BTreeMap<MoodType, u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMoodStats {
    pub date: NaiveDate,
    /// Every mood type is present, zero when not logged
    pub mood_counts: BTreeMap<MoodType, u32>,
    /// 0-100
    pub health_score: u8,
    pub total_logs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_from_str_ignores_case() {
        assert_eq!("happy".parse::<MoodType>().unwrap(), MoodType::Happy);
        assert_eq!(" Stressed ".parse::<MoodType>().unwrap(), MoodType::Stressed);
        assert!("Hangry".parse::<MoodType>().is_err());
    }

    #[test]
    fn test_new_mood_log_deserializes_camel_case() {
        let entry: NewMoodLog =
            serde_json::from_str(r#"{"userId": "u1", "mood": "Tired", "recipeId": 7}"#).unwrap();
        let log = MoodLog::new(entry, Utc::now());
        assert_eq!(log.user_id, "u1");
        assert_eq!(log.mood, MoodType::Tired);
        assert_eq!(log.recipe_id, 7);
    }

    #[test]
    fn test_mood_deserialize_ignores_case() {
        let mood: MoodType = serde_json::from_str("\"happy\"").unwrap();
        assert_eq!(mood, MoodType::Happy);
        let entry: NewMoodLog =
            serde_json::from_str(r#"{"userId": "u1", "mood": "BORED", "recipeId": 8}"#).unwrap();
        assert_eq!(entry.mood, MoodType::Bored);
        assert!(serde_json::from_str::<MoodType>("\"Hangry\"").is_err());
    }
}
