//! Mystery assembly: pick a lie, a scenario and a detective that fit together, add a
//! suspect, and render the result.

use crate::domain::story::template::{render, StoryTemplate};
use crate::domain::story::{AlibiLie, Character, Database, MysteryScenario, StoryError, Tag};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Positions of the chosen entries within their source collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedIndices {
    pub lie: usize,
    pub scenario: usize,
    pub detective: usize,
    pub suspect: usize,
}

/// A resolved selection, borrowing from the database and the template.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub lie: &'a AlibiLie,
    pub scenario: &'a MysteryScenario,
    pub detective: &'a Character,
    pub suspect: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub title: String,
    pub text: String,
}

fn shares_tag(candidate: &[Tag], lie_tags: &[Tag]) -> bool {
    candidate.iter().any(|tag| lie_tags.contains(tag))
}

/// Uniform pick among the items accepted by `matches`, or among all items when none are.
fn pick_preferring<T, R>(items: &[T], rng: &mut R, matches: impl Fn(&T) -> bool) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let matching: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches(item))
        .map(|(i, _)| i)
        .collect();

    if let Some(&i) = matching.choose(rng) {
        return Some(i);
    }
    if items.is_empty() {
        None
    } else {
        Some(rng.gen_range(0..items.len()))
    }
}

/// Chooses one lie, a scenario and detective that share a tag with it (falling back to
/// the whole collection when nothing matches), and a suspect position in
/// `0..suspect_count`.
pub fn select_indices<R: Rng + ?Sized>(
    lies: &[AlibiLie],
    scenarios: &[MysteryScenario],
    characters: &[Character],
    suspect_count: usize,
    rng: &mut R,
) -> Result<SelectedIndices, StoryError> {
    if lies.is_empty() {
        return Err(StoryError::EmptyCollection("alibi_lies"));
    }
    let lie = rng.gen_range(0..lies.len());
    let lie_tags = &lies[lie].tags;

    let scenario = pick_preferring(scenarios, rng, |s| shares_tag(&s.setting_tags, lie_tags))
        .ok_or(StoryError::EmptyCollection("mystery_scenarios"))?;
    let detective = pick_preferring(characters, rng, |c| shares_tag(&c.catches_alibis, lie_tags))
        .ok_or(StoryError::EmptyCollection("characters"))?;

    if suspect_count == 0 {
        return Err(StoryError::EmptyCollection("suspect_names"));
    }
    let suspect = rng.gen_range(0..suspect_count);

    Ok(SelectedIndices {
        lie,
        scenario,
        detective,
        suspect,
    })
}

#[derive(Debug, Clone, Default)]
pub struct MysteryAssembler {
    template: StoryTemplate,
}

impl MysteryAssembler {
    pub fn new(template: StoryTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &StoryTemplate {
        &self.template
    }

    pub fn select<'a, R: Rng + ?Sized>(
        &'a self,
        db: &'a Database,
        rng: &mut R,
    ) -> Result<Selection<'a>, StoryError> {
        let idx = select_indices(
            &db.alibi_lies,
            &db.mystery_scenarios,
            &db.characters,
            self.template.suspect_names.len(),
            rng,
        )?;
        Ok(Selection {
            lie: &db.alibi_lies[idx.lie],
            scenario: &db.mystery_scenarios[idx.scenario],
            detective: &db.characters[idx.detective],
            suspect: &self.template.suspect_names[idx.suspect],
        })
    }

    pub fn render(&self, selection: &Selection<'_>) -> Story {
        let vars = Vars::new(selection);
        let slots = vars.slots();
        Story {
            title: render(&self.template.title, &slots),
            text: render(&self.template.narrative, &slots),
        }
    }

    /// Renders the language-model prompt for a selection.
    pub fn prompt(&self, selection: &Selection<'_>) -> String {
        let vars = Vars::new(selection);
        render(&self.template.prompt, &vars.slots())
    }

    pub fn assemble<R: Rng + ?Sized>(&self, db: &Database, rng: &mut R) -> Result<Story, StoryError> {
        let selection = self.select(db, rng)?;
        Ok(self.render(&selection))
    }
}

/// Derived values the templates can reference alongside the raw fields.
struct Vars<'a> {
    sel: &'a Selection<'a>,
    category_upper: String,
    location_lower: String,
    conflict_source_lower: String,
    detective_surname: &'a str,
}

impl<'a> Vars<'a> {
    fn new(sel: &'a Selection<'a>) -> Self {
        let name = sel.detective.name.as_str();
        Self {
            sel,
            category_upper: sel.lie.category.to_uppercase(),
            location_lower: sel.scenario.location.to_lowercase(),
            conflict_source_lower: sel.scenario.conflict_source.to_lowercase(),
            detective_surname: name.split_whitespace().nth(1).unwrap_or(name),
        }
    }

    fn slots(&self) -> Vec<(&str, &str)> {
        let s = self.sel;
        vec![
            ("category", s.lie.category.as_str()),
            ("category_upper", self.category_upper.as_str()),
            ("alibi_claim", s.lie.alibi_claim.as_str()),
            ("contradiction", s.lie.contradiction.as_str()),
            ("location", s.scenario.location.as_str()),
            ("location_lower", self.location_lower.as_str()),
            ("setting_description", s.scenario.setting_description.as_str()),
            ("situation_context", s.scenario.situation_context.as_str()),
            ("conflict_source", s.scenario.conflict_source.as_str()),
            ("conflict_source_lower", self.conflict_source_lower.as_str()),
            ("time_constraints", s.scenario.time_constraints.as_str()),
            ("special_constraints", s.scenario.special_constraints.as_str()),
            ("victim_name", s.scenario.victim.name.as_str()),
            ("victim_role", s.scenario.victim.role.as_str()),
            ("victim_background", s.scenario.victim.background.as_str()),
            ("detective_name", s.detective.name.as_str()),
            ("detective_surname", self.detective_surname),
            ("detective_role", s.detective.role.as_str()),
            ("detective_background", s.detective.background.as_str()),
            ("suspect", s.suspect),
        ]
    }
}
