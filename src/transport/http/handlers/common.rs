use crate::domain::story::{Database, StoryError};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

pub fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
}

/// Client mistakes are 400; everything else surfaces its raw message as a 500.
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<StoryError>() {
        Some(StoryError::NoDatabase) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Uses the database sent with the request, or falls back to the last upload.
pub async fn resolve_database(state: &AppState, inline: Option<JsonValue>) -> anyhow::Result<Database> {
    match inline {
        Some(JsonValue::Null) | None => state.store.load().await,
        Some(value) => Ok(Database::from_value(value)?),
    }
}

pub fn is_json_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = file_name
        .map(|n| n.to_lowercase().ends_with(".json"))
        .unwrap_or(false);
    let by_type = content_type
        .map(|t| t.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false);
    by_name || by_type
}
