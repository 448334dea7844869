//! Item records and equipment.
//!
//! Every entry in a creature document's item list carries a `type` tag. The
//! tag decides which decoder handles it; equipment-like tags all produce an
//! [`Item`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The top-level `type` discriminant of an item record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Action,
    Melee,
    Spell,
    SpellcastingEntry,
    Lore,
    Weapon,
    Armor,
    Equipment,
    Consumable,
    Effect,
    Treasure,
    Shield,
    Backpack,
    Condition,
    /// A tag this importer does not know about
    Unknown(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Action => "action",
            ItemKind::Melee => "melee",
            ItemKind::Spell => "spell",
            ItemKind::SpellcastingEntry => "spellcastingentry",
            ItemKind::Lore => "lore",
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Equipment => "equipment",
            ItemKind::Consumable => "consumable",
            ItemKind::Effect => "effect",
            ItemKind::Treasure => "treasure",
            ItemKind::Shield => "shield",
            ItemKind::Backpack => "backpack",
            ItemKind::Condition => "condition",
            ItemKind::Unknown(tag) => tag,
        }
    }

    /// Whether records of this kind decode into an inventory [`Item`].
    pub fn is_equipment(&self) -> bool {
        matches!(
            self,
            ItemKind::Lore
                | ItemKind::Weapon
                | ItemKind::Armor
                | ItemKind::Equipment
                | ItemKind::Consumable
                | ItemKind::Effect
                | ItemKind::Treasure
                | ItemKind::Shield
                | ItemKind::Backpack
        )
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    /// Never fails: unrecognized tags become [`ItemKind::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().as_str() {
            "action" => ItemKind::Action,
            "melee" => ItemKind::Melee,
            "spell" => ItemKind::Spell,
            "spellcastingentry" => ItemKind::SpellcastingEntry,
            "lore" => ItemKind::Lore,
            "weapon" => ItemKind::Weapon,
            "armor" => ItemKind::Armor,
            "equipment" => ItemKind::Equipment,
            "consumable" => ItemKind::Consumable,
            "effect" => ItemKind::Effect,
            "treasure" => ItemKind::Treasure,
            "shield" => ItemKind::Shield,
            "backpack" => ItemKind::Backpack,
            "condition" => ItemKind::Condition,
            other => ItemKind::Unknown(other.to_string()),
        };
        Ok(kind)
    }
}

/// A piece of equipment carried by a creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub level: i32,
    pub description: String,
    pub price: Price,
    /// Source record type, e.g. "weapon", "consumable"
    #[serde(rename = "type")]
    pub item_type: String,
    pub traits: Vec<String>,
    pub rarity: String,
    /// Range increment in canonical decimal form (empty for melee gear)
    pub range: String,
    pub size: String,
    pub reload: String,
    /// Bulk in canonical decimal form ("0.1" is light bulk)
    pub bulk: String,
    pub quantity: u32,
}

/// Price in coins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub cp: u32,
    pub sp: u32,
    pub gp: u32,
    pub pp: u32,
    /// Number of items the price buys
    pub per: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_kind_parses_known_tags() {
        assert_eq!("melee".parse::<ItemKind>().unwrap(), ItemKind::Melee);
        assert_eq!(
            "spellcastingEntry".parse::<ItemKind>().unwrap(),
            ItemKind::SpellcastingEntry
        );
        assert_eq!(
            "heritage".parse::<ItemKind>().unwrap(),
            ItemKind::Unknown("heritage".into())
        );
    }

    #[test]
    fn condition_is_not_equipment() {
        assert!(!ItemKind::Condition.is_equipment());
        assert!(ItemKind::Backpack.is_equipment());
        assert!(ItemKind::Lore.is_equipment());
        assert!(!ItemKind::Unknown("feat".into()).is_equipment());
    }
}
