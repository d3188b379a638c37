use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::response::Html;

const EMBEDDED_PAGE: &str = include_str!("../assets/index.html");
const MISSING_PAGE: &str = "<h1>MysteryForge</h1><p>Interface file not found</p>";

pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let Some(path) = state.settings.interface_path.as_ref() else {
        return Html(EMBEDDED_PAGE.to_string());
    };
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "interface file unreadable");
            Html(MISSING_PAGE.to_string())
        }
    }
}
