//! Spellcasting entries ("containers").
//!
//! A creature groups its spells into one or more entries. The entry kind
//! decides how the spells are accessed:
//!
//! - **Prepared**: each slot names the exact spell prepared in it
//! - **Spontaneous**: slots only carry a number of casts; the spell is picked
//!   when casting, so no spell is assigned to a slot
//! - **Focus**: spells fuelled by focus points
//! - **Innate**: spells with their own per-spell use counts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::spell::{Spell, SpellUses};
use crate::error::DomainError;

/// The `prepared` sub-discriminant of a spellcasting entry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreparationType {
    Prepared,
    Spontaneous,
    Focus,
    Innate,
}

impl PreparationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreparationType::Prepared => "prepared",
            PreparationType::Spontaneous => "spontaneous",
            PreparationType::Focus => "focus",
            PreparationType::Innate => "innate",
        }
    }
}

impl fmt::Display for PreparationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreparationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prepared" => Ok(PreparationType::Prepared),
            "spontaneous" => Ok(PreparationType::Spontaneous),
            "focus" => Ok(PreparationType::Focus),
            "innate" => Ok(PreparationType::Innate),
            other => Err(DomainError::parse(format!(
                "Unknown spell preparation: {}",
                other
            ))),
        }
    }
}

/// One occupied slot of a prepared entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedSlot {
    /// Slot group label from the source, e.g. "slot3"
    pub level_label: String,
    pub spell_id: String,
    /// Filled in by the spell resolver
    pub spell: Option<Spell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedCasting {
    pub id: String,
    pub name: String,
    pub dc: i32,
    /// Spell attack modifier in canonical decimal form
    pub modifier: String,
    pub tradition: String,
    pub slots: Vec<PreparedSlot>,
}

/// Casting capacity of one spontaneous slot level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub level_label: String,
    pub max_casts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpontaneousCasting {
    pub id: String,
    pub name: String,
    pub dc: i32,
    pub modifier: String,
    pub tradition: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusCasting {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dc: i32,
    pub modifier: String,
    pub tradition: String,
    /// Level focus spells are automatically heightened to (0 when unset)
    pub cast_level: u32,
    pub spells: Vec<Spell>,
}

/// An innate spell together with how often it can be cast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellUse {
    pub spell: Spell,
    pub uses: SpellUses,
}

impl From<Spell> for SpellUse {
    fn from(spell: Spell) -> Self {
        let uses = spell.uses;
        Self { spell, uses }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnateCasting {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dc: i32,
    pub modifier: String,
    pub tradition: String,
    pub spells: Vec<SpellUse>,
}

/// A spellcasting entry of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preparation", rename_all = "camelCase")]
pub enum SpellCastingContainer {
    Prepared(PreparedCasting),
    Spontaneous(SpontaneousCasting),
    Focus(FocusCasting),
    Innate(InnateCasting),
}

impl SpellCastingContainer {
    pub fn id(&self) -> &str {
        match self {
            SpellCastingContainer::Prepared(c) => &c.id,
            SpellCastingContainer::Spontaneous(c) => &c.id,
            SpellCastingContainer::Focus(c) => &c.id,
            SpellCastingContainer::Innate(c) => &c.id,
        }
    }

    pub fn preparation(&self) -> PreparationType {
        match self {
            SpellCastingContainer::Prepared(_) => PreparationType::Prepared,
            SpellCastingContainer::Spontaneous(_) => PreparationType::Spontaneous,
            SpellCastingContainer::Focus(_) => PreparationType::Focus,
            SpellCastingContainer::Innate(_) => PreparationType::Innate,
        }
    }
}

/// All spellcasting entries of a creature, one list per entry kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellCasting {
    pub prepared: Vec<PreparedCasting>,
    pub spontaneous: Vec<SpontaneousCasting>,
    pub focus: Vec<FocusCasting>,
    pub innate: Vec<InnateCasting>,
}

impl SpellCasting {
    pub fn push(&mut self, container: SpellCastingContainer) {
        match container {
            SpellCastingContainer::Prepared(c) => self.prepared.push(c),
            SpellCastingContainer::Spontaneous(c) => self.spontaneous.push(c),
            SpellCastingContainer::Focus(c) => self.focus.push(c),
            SpellCastingContainer::Innate(c) => self.innate.push(c),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
            && self.spontaneous.is_empty()
            && self.focus.is_empty()
            && self.innate.is_empty()
    }

    /// Ids of every entry, prepared first, then spontaneous, focus and innate.
    pub fn container_ids(&self) -> Vec<&str> {
        self.prepared
            .iter()
            .map(|c| c.id.as_str())
            .chain(self.spontaneous.iter().map(|c| c.id.as_str()))
            .chain(self.focus.iter().map(|c| c.id.as_str()))
            .chain(self.innate.iter().map(|c| c.id.as_str()))
            .collect()
    }

    /// Kind of the entry with the given id.
    pub fn preparation_of(&self, container_id: &str) -> Option<PreparationType> {
        if self.prepared.iter().any(|c| c.id == container_id) {
            Some(PreparationType::Prepared)
        } else if self.spontaneous.iter().any(|c| c.id == container_id) {
            Some(PreparationType::Spontaneous)
        } else if self.focus.iter().any(|c| c.id == container_id) {
            Some(PreparationType::Focus)
        } else if self.innate.iter().any(|c| c.id == container_id) {
            Some(PreparationType::Innate)
        } else {
            None
        }
    }

    /// Number of spells attached to prepared slots, focus and innate lists.
    pub fn attached_spell_count(&self) -> usize {
        let prepared: usize = self
            .prepared
            .iter()
            .map(|c| c.slots.iter().filter(|s| s.spell.is_some()).count())
            .sum();
        let focus: usize = self.focus.iter().map(|c| c.spells.len()).sum();
        let innate: usize = self.innate.iter().map(|c| c.spells.len()).sum();
        prepared + focus + innate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preparation_type_round_trips_through_display() {
        for kind in [
            PreparationType::Prepared,
            PreparationType::Spontaneous,
            PreparationType::Focus,
            PreparationType::Innate,
        ] {
            assert_eq!(kind.to_string().parse::<PreparationType>().unwrap(), kind);
        }
        assert!("ritual".parse::<PreparationType>().is_err());
    }

    #[test]
    fn push_routes_by_variant() {
        let mut casting = SpellCasting::default();
        casting.push(SpellCastingContainer::Focus(FocusCasting {
            id: "focus-1".into(),
            ..Default::default()
        }));
        casting.push(SpellCastingContainer::Spontaneous(SpontaneousCasting {
            id: "spont-1".into(),
            ..Default::default()
        }));

        assert_eq!(casting.focus.len(), 1);
        assert_eq!(casting.spontaneous.len(), 1);
        assert_eq!(casting.container_ids(), vec!["spont-1", "focus-1"]);
        assert_eq!(
            casting.preparation_of("focus-1"),
            Some(PreparationType::Focus)
        );
        assert_eq!(casting.preparation_of("missing"), None);
    }

    #[test]
    fn spell_use_takes_uses_from_spell() {
        let spell = Spell {
            id: "s1".into(),
            uses: SpellUses::Limited(3),
            ..Default::default()
        };
        let spell_use = SpellUse::from(spell);
        assert_eq!(spell_use.uses, SpellUses::Limited(3));
    }

    #[test]
    fn container_serializes_with_preparation_tag() {
        let container = SpellCastingContainer::Innate(InnateCasting {
            id: "innate-1".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&container).unwrap();
        assert_eq!(json["preparation"], "innate");
        assert_eq!(json["id"], "innate-1");
    }
}
