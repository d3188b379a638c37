//! Story database model: the narrative fragments a user uploads.
//!
//! Lies, scenarios and detectives are joined only through tags; nothing here enforces
//! referential integrity. Only the collections and their tag arrays are required;
//! everything else is read leniently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub mod assembler;
pub mod template;

pub use assembler::{select_indices, MysteryAssembler, SelectedIndices, Selection, Story};
pub use template::StoryTemplate;

/// Tags are compared by JSON equality, so `"office"` and `3` are both usable tags.
pub type Tag = JsonValue;

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("Cannot generate a story: '{0}' is empty")]
    EmptyCollection(&'static str),
    #[error("Invalid story database: {0}")]
    InvalidDatabase(#[from] serde_json::Error),
    #[error("No database uploaded")]
    NoDatabase,
}

/// Accepts any JSON for a text field: strings as-is, `null` as empty, anything else
/// in its JSON form.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_victim<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Victim, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Database {
    /// Free-form summary metadata. Generation never reads it; only `stats()` looks inside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_info: Option<JsonValue>,
    pub alibi_lies: Vec<AlibiLie>,
    pub mystery_scenarios: Vec<MysteryScenario>,
    pub characters: Vec<Character>,
}

impl Database {
    /// Reads a database out of an already-parsed JSON document.
    pub fn from_value(value: JsonValue) -> Result<Self, StoryError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn stats(&self) -> DatabaseStats {
        let total_entries = self
            .database_info
            .as_ref()
            .and_then(|info| info.get("total_entries"))
            .and_then(JsonValue::as_object)
            .map(|entries| entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        DatabaseStats {
            alibi_lies: self.alibi_lies.len(),
            mystery_scenarios: self.mystery_scenarios.len(),
            characters: self.characters.len(),
            total_entries,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlibiLie {
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub alibi_claim: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub contradiction: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MysteryScenario {
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub setting_description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub situation_context: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub conflict_source: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_constraints: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub special_constraints: String,
    #[serde(default, deserialize_with = "lenient_victim")]
    pub victim: Victim,
    pub setting_tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Victim {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub background: String,
}

/// A detective. `catches_alibis` lists the lie tags this detective can expose.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Character {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub background: String,
    pub catches_alibis: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DatabaseStats {
    pub alibi_lies: usize,
    pub mystery_scenarios: usize,
    pub characters: usize,
    #[schema(value_type = Object)]
    pub total_entries: BTreeMap<String, JsonValue>,
}
