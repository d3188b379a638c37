use crate::app::story_service::GeneratedStory;
use crate::domain::story::DatabaseStats;
use crate::transport::http::handlers::{database, generate, health, index};
use crate::transport::http::types::{
    ApiResponse, GenerateBasicRequest, GenerateStoryRequest, HealthResponse, StoryResponse,
    UploadDatabaseForm,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Upload and JSON bodies are capped at 10 MiB.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        database::upload_database_handler,
        database::database_stats_handler,
        generate::generate_story_handler,
        generate::generate_basic_handler
    ),
    components(schemas(
        ApiResponse,
        StoryResponse,
        HealthResponse,
        GeneratedStory,
        GenerateStoryRequest,
        GenerateBasicRequest,
        UploadDatabaseForm,
        DatabaseStats
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/api/health", get(health::healthcheck_handler))
        .route("/api/database/upload", post(database::upload_database_handler))
        .route("/api/database/stats", get(database::database_stats_handler))
        .route("/api/generate-story", post(generate::generate_story_handler))
        .route("/api/generate-basic", post(generate::generate_basic_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(app_state)
}
