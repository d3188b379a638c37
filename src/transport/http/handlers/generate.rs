use crate::app::story_service::GeneratedStory;
use crate::transport::http::handlers::common::{resolve_database, status_for};
use crate::transport::http::types::{
    json_rejection, AppState, GenerateBasicRequest, GenerateStoryRequest, StoryResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

fn story_ok(story: GeneratedStory) -> (StatusCode, Json<StoryResponse>) {
    (
        StatusCode::OK,
        Json(StoryResponse {
            success: true,
            story: Some(story),
            error: None,
        }),
    )
}

fn story_err(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<StoryResponse>) {
    (
        status,
        Json(StoryResponse {
            success: false,
            story: None,
            error: Some(message.into()),
        }),
    )
}

#[utoipa::path(
    post,
    path = "/api/generate-story",
    request_body = GenerateStoryRequest,
    responses(
        (status = 200, description = "AI-enhanced story", body = StoryResponse),
        (status = 400, description = "Missing API key or database", body = StoryResponse),
        (status = 500, description = "Assembly or language-model failure", body = StoryResponse)
    )
)]
pub async fn generate_story_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateStoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => return json_rejection(e, "{ database, apiKey }").into_response(),
    };

    let api_key = match request.api_key.as_deref().map(str::trim) {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => return story_err(StatusCode::BAD_REQUEST, "API key required").into_response(),
    };

    let db = match resolve_database(&state, request.database).await {
        Ok(db) => db,
        Err(e) => return story_err(status_for(&e), e.to_string()).into_response(),
    };

    match state.stories.enhanced(&db, &api_key).await {
        Ok(story) => {
            tracing::info!(title = %story.title, "generated AI-enhanced story");
            story_ok(story).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "AI story generation failed");
            story_err(status_for(&e), e.to_string()).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/generate-basic",
    request_body = GenerateBasicRequest,
    responses(
        (status = 200, description = "Template-rendered story", body = StoryResponse),
        (status = 400, description = "No database supplied or uploaded", body = StoryResponse),
        (status = 500, description = "Assembly failure", body = StoryResponse)
    )
)]
pub async fn generate_basic_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBasicRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(p)) => p,
        // An empty body means "use the stored database".
        Err(JsonRejection::MissingJsonContentType(_)) => GenerateBasicRequest::default(),
        Err(e) => return json_rejection(e, "{ database? }").into_response(),
    };

    let db = match resolve_database(&state, request.database).await {
        Ok(db) => db,
        Err(e) => return story_err(status_for(&e), e.to_string()).into_response(),
    };

    match state.stories.basic(&db).await {
        Ok(story) => {
            tracing::info!(title = %story.title, "generated basic story");
            story_ok(story).into_response()
        }
        Err(e) => story_err(status_for(&e), e.to_string()).into_response(),
    }
}
