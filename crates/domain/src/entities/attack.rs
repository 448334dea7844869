//! Melee and ranged strikes.

use serde::{Deserialize, Serialize};

/// A Strike a creature can make.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub id: String,
    pub name: String,
    /// Attack modifier in canonical decimal form (e.g. "29", "-1")
    pub to_hit: String,
    /// Damage entries in source order
    pub damage: Vec<DamageBlock>,
    pub traits: Vec<String>,
    pub effect: DamageEffect,
}

impl Attack {
    /// Render the damage entries as a single line, e.g. "3d10+13 piercing plus 2d6 poison".
    pub fn damage_summary(&self) -> String {
        self.damage
            .iter()
            .map(|d| {
                if d.damage_type.is_empty() {
                    d.roll.clone()
                } else {
                    format!("{} {}", d.roll, d.damage_type)
                }
            })
            .collect::<Vec<_>>()
            .join(" plus ")
    }
}

/// One damage roll of a Strike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageBlock {
    /// Dice expression, e.g. "3d10+13"
    pub roll: String,
    #[serde(rename = "type")]
    pub damage_type: String,
}

/// Additional effects applied on a hit (Grab, Knockdown, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEffect {
    pub custom_text: String,
    pub conditions: Vec<String>,
}
