//! Creature abilities that are not attacks or spells.
//!
//! Actions, free actions and reactions are the activities a creature can take
//! on its turn (or in response to a trigger). Passives are always-on abilities
//! such as auras or special senses described in prose.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The `actionType` sub-discriminant carried by `action` item records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Costs one or more actions
    Action,
    /// Always-on ability
    Passive,
    /// Costs no action
    Free,
    /// Taken in response to a trigger
    Reaction,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Action => "action",
            ActionType::Passive => "passive",
            ActionType::Free => "free",
            ActionType::Reaction => "reaction",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "action" => Ok(ActionType::Action),
            "passive" => Ok(ActionType::Passive),
            "free" => Ok(ActionType::Free),
            "reaction" => Ok(ActionType::Reaction),
            other => Err(DomainError::parse(format!("Unknown action type: {}", other))),
        }
    }
}

/// An activity that costs one or more actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    /// Number of actions spent (0 when the record leaves it blank)
    pub actions: u32,
    /// Sanitized rules text
    pub description: String,
    pub traits: Vec<String>,
    /// e.g. "offensive", "defensive", "interaction"
    pub category: String,
    pub rarity: String,
}

/// An activity that costs no action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeAction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub category: String,
    pub rarity: String,
}

/// An activity taken in response to a trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub category: String,
    pub rarity: String,
}

/// An always-on ability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passive {
    pub id: String,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub category: String,
}
