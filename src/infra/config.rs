//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "./database/mysteryforge_db_structure.json";

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn optional_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Listen port (`PORT`, default 3000).
pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(3000)
}

/// Where uploads are written. Every upload overwrites this one file.
pub fn database_path() -> PathBuf {
    optional_path("MYSTERYFORGE_DATABASE_PATH").unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

/// Only accept `.json` / `application/json` uploads.
pub fn strict_upload() -> bool {
    flag("MYSTERYFORGE_STRICT_UPLOAD")
}

/// HTML file served at `/` instead of the embedded page.
pub fn interface_path() -> Option<PathBuf> {
    optional_path("MYSTERYFORGE_INTERFACE_PATH")
}

/// JSON file overriding parts of the story template.
pub fn story_template_path() -> Option<PathBuf> {
    optional_path("MYSTERYFORGE_STORY_TEMPLATE")
}

/// Fixed RNG seed for reproducible story selection.
pub fn rng_seed() -> Option<u64> {
    std::env::var("MYSTERYFORGE_SEED")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}

pub fn anthropic_base_url() -> String {
    std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| "https://api.anthropic.com".to_string())
}

pub fn anthropic_model() -> String {
    std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| "claude-3-sonnet-20240229".to_string())
}

pub fn anthropic_max_tokens() -> u32 {
    std::env::var("ANTHROPIC_MAX_TOKENS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(2000)
}
