// src/bin/api_server.rs

use mysteryforge::infra::config;
use mysteryforge::transport;
use mysteryforge::{AnthropicClient, DatabaseStore, StoryService, StoryTemplate};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn init_tracing() {
    // LOG_FORMAT - "text" (default) or "json"
    // RUST_LOG   - standard env filter (default: "mysteryforge=debug,tower_http=debug")
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mysteryforge=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    // --- Story template ---
    let template = match config::story_template_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading story template override");
            StoryTemplate::load(&path)?
        }
        None => StoryTemplate::default(),
    };

    // --- Services ---
    let store = DatabaseStore::new(config::database_path());
    tracing::info!(path = %store.path().display(), "database uploads will be written here");

    let enhancer = AnthropicClient::from_env();
    tracing::info!(model = enhancer.model(), "language model configured");

    let seed = config::rng_seed();
    if let Some(seed) = seed {
        tracing::info!(seed, "story selection is seeded");
    }

    let app_state = transport::http::AppState {
        store: Arc::new(store),
        stories: Arc::new(StoryService::new(template, Arc::new(enhancer), seed)),
        settings: Arc::new(transport::http::HttpSettings {
            strict_upload: config::strict_upload(),
            interface_path: config::interface_path(),
        }),
    };

    // --- API Server ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let port = config::port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("MysteryForge server running on port {}", port);
    tracing::info!("Access the application at: http://localhost:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
