//! Language-model story enhancement.

pub mod client;

pub use client::AnthropicClient;

/// Turns a story prompt into prose using an external language model.
///
/// The caller's API key is passed per call; the service never stores it.
#[async_trait::async_trait]
pub trait StoryEnhancer: Send + Sync {
    async fn enhance(&self, api_key: &str, prompt: &str) -> anyhow::Result<String>;
}
