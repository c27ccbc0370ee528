pub mod catalog;
pub mod mood_tracker;
pub mod preferences;
pub mod recommendations;

pub use catalog::RecipeCatalog;
pub use mood_tracker::MoodTracker;
pub use preferences::PreferenceStore;
pub use recommendations::RecipeFilter;
