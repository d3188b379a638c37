pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_store::DatabaseStore;
pub use app::story_service::{GeneratedStory, StoryService};
pub use domain::story::{Database, MysteryAssembler, Story, StoryError, StoryTemplate};
pub use infra::anthropic::{AnthropicClient, StoryEnhancer};
