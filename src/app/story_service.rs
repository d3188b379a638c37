//! Story generation service.
//!
//! Owns the assembler, the random source and the language-model enhancer. Both
//! generation paths draw exactly one selection per request; the AI path renders the
//! basic narrative and the prompt from that same selection.

use crate::domain::story::{Database, MysteryAssembler, Story, StoryTemplate};
use crate::infra::anthropic::StoryEnhancer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStory {
    pub title: String,
    pub basic_story: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_enhanced_story: Option<String>,
}

pub struct StoryService {
    assembler: MysteryAssembler,
    enhancer: Arc<dyn StoryEnhancer>,
    rng: Mutex<StdRng>,
}

impl StoryService {
    pub fn new(template: StoryTemplate, enhancer: Arc<dyn StoryEnhancer>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            assembler: MysteryAssembler::new(template),
            enhancer,
            rng: Mutex::new(rng),
        }
    }

    /// Selects and renders, returning the story and the prompt for the same selection.
    async fn draw(&self, db: &Database) -> anyhow::Result<(Story, String)> {
        let mut rng = self.rng.lock().await;
        let selection = self.assembler.select(db, &mut *rng)?;
        Ok((self.assembler.render(&selection), self.assembler.prompt(&selection)))
    }

    pub async fn basic(&self, db: &Database) -> anyhow::Result<GeneratedStory> {
        let (story, _) = self.draw(db).await?;
        Ok(GeneratedStory {
            title: story.title,
            basic_story: story.text,
            ai_enhanced_story: None,
        })
    }

    pub async fn enhanced(&self, db: &Database, api_key: &str) -> anyhow::Result<GeneratedStory> {
        let (story, prompt) = self.draw(db).await?;
        tracing::debug!(title = %story.title, "requesting AI-enhanced story");
        let enhanced = self.enhancer.enhance(api_key, &prompt).await?;
        Ok(GeneratedStory {
            title: story.title,
            basic_story: story.text,
            ai_enhanced_story: Some(enhanced),
        })
    }
}
