use crate::app::database_store::DatabaseStore;
use crate::app::story_service::{GeneratedStory, StoryService};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DatabaseStore>,
    pub stories: Arc<StoryService>,
    pub settings: Arc<HttpSettings>,
}

/// Per-deployment switches that used to be separate server variants.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Reject uploads that are neither named `*.json` nor sent as `application/json`.
    pub strict_upload: bool,
    /// Serve this file at `/` instead of the embedded page.
    pub interface_path: Option<PathBuf>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StoryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<GeneratedStory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub version: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    /// Story database. When omitted, the last uploaded database is used.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub database: Option<JsonValue>,
    /// Caller's language-model API key. Used for this request only.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct GenerateBasicRequest {
    /// Story database. When omitted, the last uploaded database is used.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub database: Option<JsonValue>,
}

/// Multipart body of `POST /api/database/upload`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadDatabaseForm {
    #[schema(value_type = String, format = Binary)]
    pub database: Vec<u8>,
}

/// Oversized bodies keep their 413; every other unreadable body is a 400.
pub fn json_rejection(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    let status = match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
