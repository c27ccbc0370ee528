use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{
    DailyMoodStats, MoodLog, MoodType, NewMoodLog, PreferenceFlag, PreferencesPatch, Recipe,
    RecipeId, UserPreferences, WeeklyMoodSummary,
};
use crate::services::{recommendations, RecipeFilter};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub mood: String,
}

#[derive(Debug, Deserialize)]
pub struct DailyStatsQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

fn owned(recipes: Vec<&Recipe>) -> Vec<Recipe> {
    recipes.into_iter().cloned().collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List recipes, optionally narrowed by mood, meal type, time or preferences
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(filter): Query<RecipeFilter>,
) -> Json<Vec<Recipe>> {
    let inner = state.inner.read().await;
    let prefs = inner.preferences.preferences();
    Json(owned(filter.apply(&inner.catalog, &prefs)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> AppResult<Json<Recipe>> {
    let inner = state.inner.read().await;
    inner
        .catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {}", id)))
}

/// Flip the favorite flag; unknown ids answer 204 and change nothing
pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<RecipeId>) -> Response {
    let mut inner = state.inner.write().await;
    inner.catalog.toggle_favorite(id);
    match inner.catalog.get(id) {
        Some(recipe) => Json(recipe.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn get_favorites(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    let inner = state.inner.read().await;
    Json(owned(inner.catalog.favorite_recipes()))
}

pub async fn get_trending(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    let inner = state.inner.read().await;
    Json(owned(inner.catalog.trending_recipes()))
}

/// Recipes for a mood that fit the current preferences
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let mood: MoodType = query.mood.parse()?;
    let inner = state.inner.read().await;
    let prefs = inner.preferences.preferences();
    Ok(Json(owned(recommendations::recommend(
        &inner.catalog,
        &prefs,
        mood,
    ))))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    let inner = state.inner.read().await;
    Json(inner.preferences.preferences())
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(patch): Json<PreferencesPatch>,
) -> Json<UserPreferences> {
    let mut inner = state.inner.write().await;
    Json(inner.preferences.apply(patch).await)
}

pub async fn toggle_preference(
    State(state): State<AppState>,
    Path(flag): Path<String>,
) -> AppResult<Json<UserPreferences>> {
    let flag: PreferenceFlag = flag.parse()?;
    let mut inner = state.inner.write().await;
    Ok(Json(inner.preferences.toggle(flag).await))
}

/// Record the user's mood for a recipe they picked
pub async fn log_mood(
    State(state): State<AppState>,
    Json(entry): Json<NewMoodLog>,
) -> AppResult<(StatusCode, Json<MoodLog>)> {
    let inner = state.inner.read().await;
    let log = state
        .moods
        .record(entry, &inner.catalog, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn weekly_mood_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<WeeklyMoodSummary>> {
    let summary = state.moods.weekly_summary(&user_id, Utc::now()).await?;
    Ok(Json(summary))
}

pub async fn daily_mood_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<DailyStatsQuery>,
) -> AppResult<Json<Vec<DailyMoodStats>>> {
    let stats = state
        .moods
        .daily_stats(&user_id, query.days, Utc::now())
        .await?;
    Ok(Json(stats))
}
