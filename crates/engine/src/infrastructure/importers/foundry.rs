//! Monster assembly from Foundry-style actor documents.
//!
//! An actor document carries the creature's block attributes under `system`
//! and everything it can do as a flat `items` list. [`MonsterImporter`] reads
//! the attributes directly, classifies the item list, links spells into their
//! spellcasting entries and returns the finished [`Monster`].

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use bestiary_domain::{
    AbilityScores, Monster, Movement, Resistance, Saves, Sense, Skill, SkillSpecial,
    SpellCasting, TraitBlock,
};

use super::classify::{classify_all, ClassifiedItems};
use super::extract::{
    array_at, clamp_i32, entries_at, has, i32_at, int_at_any, list_at, str_at, str_at_any, u32_at,
};
use super::resolve::resolve_spells;
use super::sanitize::sanitize;
use crate::infrastructure::ports::DiagnosticsSink;

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not an actor document: {0}")]
    NotAnActor(String),
}

/// Builds [`Monster`]s from raw actor documents.
///
/// Holds no per-document state, so one importer can serve parallel parses.
#[derive(Clone)]
pub struct MonsterImporter {
    sink: Arc<dyn DiagnosticsSink>,
}

impl MonsterImporter {
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { sink }
    }

    /// Decode `text` as JSON and import it.
    pub fn import_str(&self, text: &str) -> Result<Monster, ImportError> {
        let document: Value = serde_json::from_str(text)?;
        self.import(&document)
    }

    /// Import one decoded actor document.
    ///
    /// Fails only when the document has no usable shape; missing fields fall
    /// back to defaults and problem items go to the diagnostics sink.
    pub fn import(&self, document: &Value) -> Result<Monster, ImportError> {
        if !document.is_object() {
            return Err(ImportError::NotAnActor("document is not an object".into()));
        }
        let items = match document.get("items") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err(ImportError::NotAnActor("items is not a list".into())),
        };

        let name = str_at(document, &["name"]);
        let ClassifiedItems {
            actions,
            free_actions,
            reactions,
            passives,
            melee,
            ranged,
            spells,
            containers,
            inventory,
            unclassified,
        } = classify_all(items, self.sink.as_ref());

        let mut casting = SpellCasting::default();
        for container in containers {
            casting.push(container);
        }
        let resolution = resolve_spells(&spells, casting);
        for issue in &resolution.issues {
            tracing::warn!(monster = %name, issue = %issue, "Spell resolution issue");
            self.sink
                .record(&issue.kind(), &issue.fragment(), &issue.to_string());
        }

        tracing::debug!(
            monster = %name,
            items = items.len(),
            unclassified,
            spells = spells.len(),
            unresolved = resolution.issues.len(),
            "Imported monster"
        );

        Ok(Monster {
            id: str_at(document, &["_id"]),
            name,
            traits: trait_block(document),
            abilities: abilities(document),
            level: i32_at(document, &["system", "details", "level", "value"]),
            saves: saves(document),
            ac: i32_at(document, &["system", "attributes", "ac", "value"]),
            ac_details: str_at(document, &["system", "attributes", "ac", "details"]),
            hp: clamp_i32(int_at_any(
                document,
                &[
                    &["system", "attributes", "hp", "max"],
                    &["system", "attributes", "hp", "value"],
                ],
            )),
            hp_details: str_at(document, &["system", "attributes", "hp", "details"]),
            immunities: list_at(document, &["system", "attributes", "immunities"]),
            weaknesses: resistances(document, "weaknesses"),
            resistances: resistances(document, "resistances"),
            perception: clamp_i32(int_at_any(
                document,
                &[
                    &["system", "perception", "mod"],
                    &["system", "attributes", "perception", "value"],
                ],
            )),
            languages: languages(document),
            senses: senses(document),
            skills: skills(document),
            movements: movements(document),
            focus_points: u32_at(document, &["system", "resources", "focus", "max"]),
            source: str_at_any(
                document,
                &[
                    &["system", "details", "publication", "title"],
                    &["system", "details", "source", "value"],
                ],
            ),
            notes: sanitize(&str_at(document, &["system", "details", "publicNotes"])),
            inventory,
            actions,
            free_actions,
            reactions,
            passives,
            melee,
            ranged,
            spells,
            spell_casting: resolution.casting,
        })
    }
}

fn trait_block(document: &Value) -> TraitBlock {
    TraitBlock {
        rarity: str_at(document, &["system", "traits", "rarity"]),
        size: str_at(document, &["system", "traits", "size", "value"]),
        traits: list_at(document, &["system", "traits", "value"]),
    }
}

fn abilities(document: &Value) -> AbilityScores {
    let ability = |key: &str| i32_at(document, &["system", "abilities", key, "mod"]);
    AbilityScores {
        str: ability("str"),
        dex: ability("dex"),
        con: ability("con"),
        int: ability("int"),
        wis: ability("wis"),
        cha: ability("cha"),
    }
}

fn saves(document: &Value) -> Saves {
    let save = |key: &str| i32_at(document, &["system", "saves", key, "value"]);
    Saves {
        fortitude: save("fortitude"),
        reflex: save("reflex"),
        will: save("will"),
        all_saves: str_at(document, &["system", "attributes", "allSaves", "value"]),
    }
}

fn resistances(document: &Value, key: &str) -> Vec<Resistance> {
    array_at(document, &["system", "attributes", key])
        .iter()
        .map(|entry| Resistance {
            kind: str_at(entry, &["type"]),
            value: i32_at(entry, &["value"]),
            exceptions: list_at(entry, &["exceptions"]),
        })
        .filter(|r| !r.kind.is_empty())
        .collect()
}

fn languages(document: &Value) -> Vec<String> {
    let current = list_at(document, &["system", "details", "languages", "value"]);
    if current.is_empty() {
        list_at(document, &["system", "traits", "languages", "value"])
    } else {
        current
    }
}

/// Structured senses, or the comma separated text older documents carry.
fn senses(document: &Value) -> Vec<Sense> {
    let structured: Vec<Sense> = array_at(document, &["system", "perception", "senses"])
        .iter()
        .map(|entry| Sense {
            name: str_at(entry, &["type"]),
            acuity: str_at(entry, &["acuity"]),
            range: u32_at(entry, &["range"]),
        })
        .filter(|s| !s.name.is_empty())
        .collect();
    if !structured.is_empty() {
        return structured;
    }

    str_at(document, &["system", "traits", "senses", "value"])
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Sense {
            name: part.to_string(),
            ..Default::default()
        })
        .collect()
}

fn skills(document: &Value) -> Vec<Skill> {
    entries_at(document, &["system", "skills"])
        .into_iter()
        .map(|(name, entry)| Skill {
            name: name.to_string(),
            value: clamp_i32(int_at_any(entry, &[&["base"], &["value"]])),
            specials: array_at(entry, &["special"])
                .iter()
                .map(|special| SkillSpecial {
                    value: clamp_i32(int_at_any(special, &[&["base"], &["value"]])),
                    label: str_at(special, &["label"]),
                    predicates: list_at(special, &["predicate"]),
                })
                .collect(),
        })
        .collect()
}

fn movements(document: &Value) -> Vec<Movement> {
    let mut movements = Vec::new();
    if has(document, &["system", "attributes", "speed", "value"]) {
        movements.push(Movement {
            kind: "land".to_string(),
            value: i32_at(document, &["system", "attributes", "speed", "value"]),
        });
    }
    movements.extend(
        array_at(document, &["system", "attributes", "speed", "otherSpeeds"])
            .iter()
            .map(|entry| Movement {
                kind: str_at(entry, &["type"]),
                value: i32_at(entry, &["value"]),
            })
            .filter(|m| !m.kind.is_empty()),
    );
    movements
}
