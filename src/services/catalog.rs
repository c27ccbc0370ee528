use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, RecipeId},
};

const SEED_RECIPES: &str = include_str!("../../data/recipes.json");

/// The fixed collection of recipes
///
/// Order is the order the recipes were supplied in and every derived view
/// preserves it. Only the favorite flag can change after construction.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Builds a catalog, rejecting duplicate ids
    pub fn new(recipes: Vec<Recipe>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if !seen.insert(recipe.id) {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate recipe id {}",
                    recipe.id
                )));
            }
        }

        Ok(Self { recipes })
    }

    /// The bundled seed catalog
    pub fn seeded() -> AppResult<Self> {
        let recipes: Vec<Recipe> = serde_json::from_str(SEED_RECIPES)
            .map_err(|e| AppError::Internal(format!("Seed catalog is malformed: {}", e)))?;
        tracing::debug!(count = recipes.len(), "Loaded seed catalog");
        Self::new(recipes)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Flips the favorite flag of a recipe
    ///
    /// Unknown ids are ignored. Returns the new flag value when the recipe
    /// exists.
    pub fn toggle_favorite(&mut self, id: RecipeId) -> Option<bool> {
        match self.recipes.iter_mut().find(|r| r.id == id) {
            Some(recipe) => {
                recipe.favorite = !recipe.favorite;
                tracing::debug!(recipe_id = id, favorite = recipe.favorite, "Toggled favorite");
                Some(recipe.favorite)
            }
            None => {
                tracing::debug!(recipe_id = id, "Ignoring favorite toggle for unknown recipe");
                None
            }
        }
    }

    /// Recipes marked as favorite, in catalog order
    pub fn favorite_recipes(&self) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.favorite).collect()
    }

    /// Recipes marked as trending, in catalog order
    pub fn trending_recipes(&self) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.trending).collect()
    }
}
