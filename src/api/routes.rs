use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/:id", get(handlers::get_recipe))
        .route("/recipes/:id/favorite", post(handlers::toggle_favorite))
        .route("/favorites", get(handlers::get_favorites))
        .route("/trending", get(handlers::get_trending))
        .route("/recommendations", get(handlers::get_recommendations))
        // User preferences
        .route(
            "/preferences",
            get(handlers::get_preferences).patch(handlers::update_preferences),
        )
        .route("/preferences/:flag/toggle", post(handlers::toggle_preference))
        // Mood log
        .route("/moods", post(handlers::log_mood))
        .route("/moods/:user_id/weekly", get(handlers::weekly_mood_summary))
        .route("/moods/:user_id/daily", get(handlers::daily_mood_stats))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
