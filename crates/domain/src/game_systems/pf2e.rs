//! Pathfinder 2nd Edition encounter building.
//!
//! Encounters are built from an XP budget that depends on the threat level
//! and the number of characters in the party. Each creature costs XP based on
//! its level relative to the party level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Party size the base budgets are written for.
pub const STANDARD_PARTY_SIZE: u32 = 4;

/// Encounter threat level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Trivial,
    Low,
    Moderate,
    Severe,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Trivial,
        Difficulty::Low,
        Difficulty::Moderate,
        Difficulty::Severe,
        Difficulty::Extreme,
    ];

    /// XP budget for a party of four.
    pub fn base_budget(&self) -> u32 {
        match self {
            Difficulty::Trivial => 40,
            Difficulty::Low => 60,
            Difficulty::Moderate => 80,
            Difficulty::Severe => 120,
            Difficulty::Extreme => 160,
        }
    }

    /// XP added (or removed) per character above (or below) four.
    pub fn character_adjustment(&self) -> u32 {
        match self {
            Difficulty::Trivial => 10,
            Difficulty::Low => 20,
            Difficulty::Moderate => 20,
            Difficulty::Severe => 30,
            Difficulty::Extreme => 40,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Trivial => "trivial",
            Difficulty::Low => "low",
            Difficulty::Moderate => "moderate",
            Difficulty::Severe => "severe",
            Difficulty::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Ok(Difficulty::Trivial),
            "low" => Ok(Difficulty::Low),
            "moderate" => Ok(Difficulty::Moderate),
            "severe" => Ok(Difficulty::Severe),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(DomainError::parse(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// XP budget for an encounter of the given threat against a party.
///
/// The budget moves linearly by the difficulty's character adjustment for each
/// character above or below four, and never drops below zero.
pub fn encounter_budget(difficulty: Difficulty, party_size: u32) -> Result<u32, DomainError> {
    if party_size == 0 {
        return Err(DomainError::validation("party size must be at least 1"));
    }

    let base = i64::from(difficulty.base_budget());
    let step = i64::from(difficulty.character_adjustment());
    let delta = i64::from(party_size) - i64::from(STANDARD_PARTY_SIZE);
    let budget = (base + delta * step).max(0);

    Ok(u32::try_from(budget).unwrap_or(u32::MAX))
}

/// XP a single creature is worth against a party of the given level.
///
/// Creatures more than four levels below the party are worth nothing; more
/// than four levels above is off the chart and costs the maximum.
pub fn creature_xp(creature_level: i32, party_level: i32) -> u32 {
    match creature_level.saturating_sub(party_level) {
        d if d < -4 => 0,
        -4 => 10,
        -3 => 15,
        -2 => 20,
        -1 => 30,
        0 => 40,
        1 => 60,
        2 => 80,
        3 => 120,
        _ => 160,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_party_budgets() {
        let budgets: Vec<u32> = Difficulty::ALL
            .iter()
            .map(|d| encounter_budget(*d, 4).unwrap())
            .collect();
        assert_eq!(budgets, vec![40, 60, 80, 120, 160]);
    }

    #[test]
    fn larger_party_adds_adjustment_per_character() {
        assert_eq!(encounter_budget(Difficulty::Trivial, 5).unwrap(), 50);
        assert_eq!(encounter_budget(Difficulty::Moderate, 6).unwrap(), 120);
        assert_eq!(encounter_budget(Difficulty::Extreme, 5).unwrap(), 200);
    }

    #[test]
    fn smaller_party_removes_adjustment_per_character() {
        assert_eq!(encounter_budget(Difficulty::Low, 3).unwrap(), 40);
        assert_eq!(encounter_budget(Difficulty::Severe, 2).unwrap(), 60);
        assert_eq!(encounter_budget(Difficulty::Trivial, 1).unwrap(), 10);
    }

    #[test]
    fn empty_party_is_rejected() {
        assert!(matches!(
            encounter_budget(Difficulty::Moderate, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn creature_xp_by_level_difference() {
        assert_eq!(creature_xp(1, 6), 0);
        assert_eq!(creature_xp(2, 6), 10);
        assert_eq!(creature_xp(5, 6), 30);
        assert_eq!(creature_xp(6, 6), 40);
        assert_eq!(creature_xp(9, 6), 120);
        assert_eq!(creature_xp(14, 6), 160);
    }

    #[test]
    fn creature_xp_at_level_extremes() {
        assert_eq!(creature_xp(i32::MAX, i32::MIN), 160);
        assert_eq!(creature_xp(i32::MIN, i32::MAX), 0);
    }

    #[test]
    fn difficulty_parses() {
        assert_eq!("Severe".parse::<Difficulty>().unwrap(), Difficulty::Severe);
        assert!("deadly".parse::<Difficulty>().is_err());
    }
}
