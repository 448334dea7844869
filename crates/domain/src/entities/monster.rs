//! Monster aggregate - a fully decoded creature stat block.

use serde::{Deserialize, Serialize};

use super::action::{Action, FreeAction, Passive, Reaction};
use super::attack::Attack;
use super::item::Item;
use super::spell::Spell;
use super::spellcasting::SpellCasting;

/// A creature and everything it can do.
///
/// Built once from a single source document and not modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub traits: TraitBlock,
    pub abilities: AbilityScores,
    pub level: i32,
    pub saves: Saves,
    pub ac: i32,
    pub ac_details: String,
    pub hp: i32,
    pub hp_details: String,
    pub immunities: Vec<String>,
    pub weaknesses: Vec<Resistance>,
    pub resistances: Vec<Resistance>,
    pub perception: i32,
    pub languages: Vec<String>,
    pub senses: Vec<Sense>,
    pub skills: Vec<Skill>,
    pub movements: Vec<Movement>,
    pub focus_points: u32,
    /// Publication the creature comes from
    pub source: String,
    /// Sanitized public notes
    pub notes: String,
    pub inventory: Vec<Item>,
    pub actions: Vec<Action>,
    pub free_actions: Vec<FreeAction>,
    pub reactions: Vec<Reaction>,
    pub passives: Vec<Passive>,
    pub melee: Vec<Attack>,
    pub ranged: Vec<Attack>,
    pub spells: Vec<Spell>,
    pub spell_casting: SpellCasting,
}

impl Monster {
    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn rituals(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter().filter(|s| s.ritual)
    }

    /// Speed for a movement type ("land", "fly", ...).
    pub fn speed(&self, kind: &str) -> Option<i32> {
        self.movements
            .iter()
            .find(|m| m.kind.eq_ignore_ascii_case(kind))
            .map(|m| m.value)
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitBlock {
    pub rarity: String,
    pub size: String,
    pub traits: Vec<String>,
}

/// Ability modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saves {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
    /// Situational notes that apply to all saves
    pub all_saves: String,
}

/// A weakness or resistance entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resistance {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i32,
    pub exceptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub name: String,
    /// "precise", "imprecise", "vague" or empty
    pub acuity: String,
    /// Range in feet (0 when unlimited or unspecified)
    pub range: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub value: i32,
    pub specials: Vec<SkillSpecial>,
}

/// A conditional skill modifier, e.g. "+20 to Climb".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSpecial {
    pub value: i32,
    pub label: String,
    pub predicates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// "land", "fly", "swim", "climb", "burrow"
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i32,
}
