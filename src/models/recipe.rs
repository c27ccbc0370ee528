use serde::{Deserialize, Serialize};

use super::MoodType;

/// Catalog-unique recipe identifier
pub type RecipeId = u32;

/// Diet classification a recipe satisfies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Diet {
    Vegetarian,
    Vegan,
    #[serde(rename = "High-Protein")]
    HighProtein,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    Halal,
}

impl Diet {
    /// Vegetarian and vegan dishes contain no meat
    pub fn is_plant_based(&self) -> bool {
        matches!(self, Diet::Vegetarian | Diet::Vegan)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Cuisine {
    American,
    Italian,
    Mexican,
    Asian,
    Japanese,
    Javanese,
    Padang,
    Sundanese,
    Nusantara,
    ChineseIndonesian,
    ComfortFood,
    SpicyFood,
    StreetFood,
}

/// Allergens a recipe contains
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AllergyWarnings {
    pub nut: bool,
    pub dairy: bool,
    pub egg: bool,
    pub fish: bool,
    pub shellfish: bool,
}

/// A single recipe in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    /// Mood the recipe is suggested for
    pub mood: MoodType,
    /// Preparation time in minutes
    #[serde(rename = "time")]
    pub prep_minutes: u32,
    pub diet: Vec<Diet>,
    pub image: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub meal_type: String,
    pub cuisine: Vec<Cuisine>,
    #[serde(default)]
    pub allergy_warning: AllergyWarnings,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub trending: bool,
}

impl Recipe {
    pub fn has_diet(&self, diet: Diet) -> bool {
        self.diet.contains(&diet)
    }

    pub fn is_plant_based(&self) -> bool {
        self.diet.iter().any(Diet::is_plant_based)
    }

    pub fn matches_mood(&self, mood: MoodType) -> bool {
        self.mood == mood
    }

    pub fn matches_meal_type(&self, meal_type: &str) -> bool {
        self.meal_type.eq_ignore_ascii_case(meal_type.trim())
    }
}
