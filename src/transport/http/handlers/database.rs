use crate::domain::story::Database;
use crate::transport::http::handlers::common::{api_error, is_json_upload};
use crate::transport::http::types::{ApiResponse, AppState, UploadDatabaseForm};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

const UPLOAD_FIELD: &str = "database";

#[utoipa::path(
    post,
    path = "/api/database/upload",
    request_body(content = UploadDatabaseForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Database stored and parsed", body = ApiResponse),
        (status = 400, description = "No file, or file type rejected", body = ApiResponse),
        (status = 500, description = "File is not valid JSON", body = ApiResponse)
    )
)]
pub async fn upload_database_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, e.body_text()).into_response(),
    };

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, e.body_text()).into_response(),
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        if state.settings.strict_upload && !is_json_upload(file_name.as_deref(), content_type.as_deref()) {
            return api_error(StatusCode::BAD_REQUEST, "Only JSON files allowed").into_response();
        }

        match field.bytes().await {
            Ok(bytes) => {
                upload = Some(bytes);
                break;
            }
            Err(e) => return api_error(StatusCode::BAD_REQUEST, e.body_text()).into_response(),
        }
    }

    let Some(bytes) = upload else {
        return api_error(StatusCode::BAD_REQUEST, "No file uploaded").into_response();
    };

    // The slot is overwritten before parsing, malformed or not.
    if let Err(e) = state.store.save(&bytes).await {
        tracing::error!(error = %e, "failed to store uploaded database");
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    match serde_json::from_slice::<JsonValue>(&bytes) {
        Ok(parsed) => {
            tracing::info!(bytes = bytes.len(), "database uploaded");
            (
                StatusCode::OK,
                Json(ApiResponse {
                    success: true,
                    data: Some(parsed),
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "uploaded database is not valid JSON");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/database/stats",
    responses(
        (status = 200, description = "Counts for the stored database", body = ApiResponse),
        (status = 404, description = "Nothing uploaded yet", body = ApiResponse),
        (status = 500, description = "Stored database cannot be read", body = ApiResponse)
    )
)]
pub async fn database_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let raw = match state.store.load_raw().await {
        Ok(Some(raw)) => raw,
        Ok(None) => return api_error(StatusCode::NOT_FOUND, "No database uploaded").into_response(),
        Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let stats = match Database::from_value(raw).and_then(|db| Ok(serde_json::to_value(db.stats())?)) {
        Ok(stats) => stats,
        Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(stats),
            error: None,
        }),
    )
        .into_response()
}
