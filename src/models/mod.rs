mod mood;
mod recipe;
mod user_preferences;

pub use mood::{DailyMoodStats, MoodLog, MoodType, NewMoodLog, WeeklyMoodSummary};
pub use recipe::{AllergyWarnings, Cuisine, Diet, Recipe, RecipeId};
pub use user_preferences::{PreferenceFlag, PreferencesPatch, UserPreferences};
