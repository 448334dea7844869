//! Spell entity for creature spellcasting.
//!
//! Spells are stored as independent records that point back at the
//! spellcasting entry they belong to. The link is resolved after all items of
//! a creature have been decoded; see the engine's spell resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A spell as it appears on a creature's stat block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: String,
    pub name: String,
    /// Level the spell is actually cast at (may be heightened)
    pub cast_level: u32,
    /// Minimum level of the spell
    pub base_level: u32,
    /// Sanitized rules text
    pub description: String,
    pub range: String,
    pub area: SpellArea,
    pub duration: SpellDuration,
    pub targets: String,
    pub traits: Vec<String>,
    pub defense: SpellDefense,
    /// Casting time, e.g. "2" or "1 minute"
    pub cast_time: String,
    pub requirements: String,
    pub rarity: String,
    /// Usable without consuming a tracked use counter
    pub at_will: bool,
    /// Id of the spellcasting entry this spell belongs to (empty for rituals)
    pub container_id: String,
    pub uses: SpellUses,
    pub ritual: bool,
    pub ritual_data: RitualData,
}

impl Spell {
    /// Whether the spell should be linked to a spellcasting entry.
    pub fn is_linkable(&self) -> bool {
        !self.ritual && !self.container_id.is_empty()
    }
}

/// How many times a spell can be cast.
///
/// Serialized as a string: either a count (`"3"`) or the literal `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SpellUses {
    Unlimited,
    Limited(u32),
}

impl SpellUses {
    pub const UNLIMITED: &'static str = "unlimited";

    pub fn is_unlimited(&self) -> bool {
        matches!(self, SpellUses::Unlimited)
    }
}

impl Default for SpellUses {
    fn default() -> Self {
        SpellUses::Limited(1)
    }
}

impl fmt::Display for SpellUses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellUses::Unlimited => f.write_str(Self::UNLIMITED),
            SpellUses::Limited(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for SpellUses {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::UNLIMITED) {
            return Ok(SpellUses::Unlimited);
        }
        s.parse::<u32>()
            .map(SpellUses::Limited)
            .map_err(|_| DomainError::parse(format!("Invalid spell uses: {}", s)))
    }
}

impl From<SpellUses> for String {
    fn from(uses: SpellUses) -> Self {
        uses.to_string()
    }
}

impl TryFrom<String> for SpellUses {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Area of effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellArea {
    /// e.g. "burst", "cone", "emanation"
    #[serde(rename = "type")]
    pub area_type: String,
    /// Size in feet
    pub value: u32,
    pub detail: String,
}

impl SpellArea {
    pub fn is_empty(&self) -> bool {
        self.area_type.is_empty() && self.value == 0 && self.detail.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDuration {
    pub sustained: bool,
    pub text: String,
}

/// Saving throw a target attempts against the spell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDefense {
    /// "fortitude", "reflex", "will" or empty
    pub save_type: String,
    pub basic: bool,
}

/// Check data for rituals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RitualData {
    pub primary_check: String,
    pub secondary_casters: u32,
    pub secondary_check: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_uses_parses_counts_and_unlimited() {
        assert_eq!("3".parse::<SpellUses>().unwrap(), SpellUses::Limited(3));
        assert_eq!("unlimited".parse::<SpellUses>().unwrap(), SpellUses::Unlimited);
        assert_eq!("Unlimited".parse::<SpellUses>().unwrap(), SpellUses::Unlimited);
        assert!("often".parse::<SpellUses>().is_err());
    }

    #[test]
    fn spell_uses_serializes_as_string() {
        assert_eq!(
            serde_json::to_value(SpellUses::Unlimited).unwrap(),
            serde_json::json!("unlimited")
        );
        assert_eq!(
            serde_json::to_value(SpellUses::Limited(2)).unwrap(),
            serde_json::json!("2")
        );
        let parsed: SpellUses = serde_json::from_value(serde_json::json!("4")).unwrap();
        assert_eq!(parsed, SpellUses::Limited(4));
    }

    #[test]
    fn default_uses_is_one() {
        assert_eq!(SpellUses::default().to_string(), "1");
    }

    #[test]
    fn rituals_are_never_linkable() {
        let spell = Spell {
            container_id: "entry-1".into(),
            ritual: true,
            ..Default::default()
        };
        assert!(!spell.is_linkable());

        let spell = Spell {
            container_id: "entry-1".into(),
            ..Default::default()
        };
        assert!(spell.is_linkable());
    }
}
