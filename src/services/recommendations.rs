use serde::Deserialize;

use crate::{
    models::{Diet, MoodType, Recipe, UserPreferences},
    services::catalog::RecipeCatalog,
};

/// Whether a recipe is safe and acceptable under the given preferences
///
/// Diet flags require a matching diet tag (vegetarian also accepts vegan,
/// halal also accepts plant-based dishes). Allergy flags exclude recipes
/// carrying the matching warning.
pub fn is_compatible(recipe: &Recipe, prefs: &UserPreferences) -> bool {
    let warnings = &recipe.allergy_warning;

    if prefs.is_vegan && !recipe.has_diet(Diet::Vegan) {
        return false;
    }
    if prefs.is_vegetarian && !recipe.is_plant_based() {
        return false;
    }
    if prefs.is_gluten_free && !recipe.has_diet(Diet::GlutenFree) {
        return false;
    }
    if prefs.is_halal && !(recipe.has_diet(Diet::Halal) || recipe.is_plant_based()) {
        return false;
    }

    !((prefs.has_nut_allergy && warnings.nut)
        || (prefs.has_dairy_allergy && warnings.dairy)
        || (prefs.has_egg_allergy && warnings.egg)
        || (prefs.has_fish_allergy && warnings.fish)
        || (prefs.has_shellfish_allergy && warnings.shellfish))
}

/// Recipes compatible with the preferences, in catalog order
pub fn compatible_recipes<'a>(
    catalog: &'a RecipeCatalog,
    prefs: &UserPreferences,
) -> Vec<&'a Recipe> {
    catalog
        .recipes()
        .iter()
        .filter(|r| is_compatible(r, prefs))
        .collect()
}

/// Optional narrowing of the catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    pub mood: Option<MoodType>,
    pub meal_type: Option<String>,
    pub max_minutes: Option<u32>,
    /// Only keep recipes compatible with the current preferences
    #[serde(default)]
    pub compatible_only: bool,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe, prefs: &UserPreferences) -> bool {
        self.mood.map_or(true, |m| recipe.matches_mood(m))
            && self
                .meal_type
                .as_deref()
                .map_or(true, |t| recipe.matches_meal_type(t))
            && self.max_minutes.map_or(true, |max| recipe.prep_minutes <= max)
            && (!self.compatible_only || is_compatible(recipe, prefs))
    }

    pub fn apply<'a>(&self, catalog: &'a RecipeCatalog, prefs: &UserPreferences) -> Vec<&'a Recipe> {
        catalog
            .recipes()
            .iter()
            .filter(|r| self.matches(r, prefs))
            .collect()
    }
}

/// Recommends recipes for a mood
///
/// Keeps the recipes tagged with the mood that are compatible with the
/// preferences. Trending recipes come first; the sort is stable so catalog
/// order holds within each group.
pub fn recommend<'a>(
    catalog: &'a RecipeCatalog,
    prefs: &UserPreferences,
    mood: MoodType,
) -> Vec<&'a Recipe> {
    let mut picks: Vec<&Recipe> = catalog
        .recipes()
        .iter()
        .filter(|r| r.matches_mood(mood) && is_compatible(r, prefs))
        .collect();
    picks.sort_by_key(|r| !r.trending);

    tracing::debug!(
        mood = %mood,
        count = picks.len(),
        "Generated recommendations"
    );

    picks
}
