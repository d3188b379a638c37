//! Narrative and prompt templates plus the suspect roster.
//!
//! Templates use `{name}` slots. Rendering is a single left-to-right pass: substituted
//! values are copied verbatim and never scanned again, and unknown slots are kept as-is.

use serde::Deserialize;
use std::path::Path;

const DEFAULT_TITLE: &str = "The {category} Contradiction";

const DEFAULT_NARRATIVE: &str = "THE {category_upper} CONTRADICTION

SETTING: {location}
{setting_description}

SITUATION: {situation_context}
CONFLICT: {conflict_source}

THE VICTIM: {victim_name}, {victim_role}
{victim_background}

THE DETECTIVE: {detective_name}, {detective_role}
{detective_background}

THE MYSTERY:
During {time_constraints}, {victim_name} is found dead in the {location_lower}. {special_constraints}

THE SUSPECT'S ALIBI:
{suspect} claims: \"{alibi_claim}\"

THE CONTRADICTION:
Detective {detective_surname} realizes the fatal flaw in this {category} alibi: {contradiction}

THE SOLUTION:
When confronted with the impossibility of their alibi, {suspect} breaks down and confesses to the crime, revealing their motive was connected to {conflict_source_lower}.";

const DEFAULT_PROMPT: &str = "Create a compelling 5-minute mystery story using these components:

ALIBI-LIE: {alibi_claim}
CONTRADICTION: {contradiction}
SETTING: {location} - {setting_description}
VICTIM: {victim_name}, {victim_role}
DETECTIVE: {detective_name}, {detective_role}
SUSPECT: {suspect}
CONFLICT: {conflict_source}

Create a complete mystery story that follows this structure:
1. Scene setup and victim discovery
2. Initial suspect interviews and alibis
3. Detective's expert analysis reveals the contradiction
4. Confrontation and confession
5. Resolution explaining motive and method

Make it engaging, logical, and solvable. Focus on the \"aha moment\" when the alibi fails.
Format as a complete story, not an outline.";

const DEFAULT_SUSPECTS: [&str; 4] = [
    "Marcus Sterling",
    "Elena Rodriguez",
    "James Whitmore",
    "Dr. Patricia Vale",
];

/// Everything about story text that is data rather than logic.
///
/// Deserializing fills omitted fields from the defaults, so an override file only has
/// to name what it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoryTemplate {
    pub title: String,
    pub narrative: String,
    pub prompt: String,
    pub suspect_names: Vec<String>,
}

impl Default for StoryTemplate {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            narrative: DEFAULT_NARRATIVE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            suspect_names: DEFAULT_SUSPECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StoryTemplate {
    /// Loads a (possibly partial) template override from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read story template {}: {}", path.display(), e))?;
        let template: StoryTemplate = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid story template {}: {}", path.display(), e))?;
        if template.suspect_names.is_empty() {
            return Err(anyhow::anyhow!(
                "Story template {} has no suspect_names",
                path.display()
            ));
        }
        Ok(template)
    }
}

/// Fills `{key}` slots in `template` from `vars`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
