//! Bestiary domain model.
//!
//! Strongly typed creature stat blocks: actions, strikes, spells and the
//! spellcasting entries that hold them, equipment and the [`Monster`]
//! aggregate. No I/O lives here.

pub mod entities;
pub mod error;
pub mod game_systems;

pub use entities::{
    AbilityScores, Action, ActionType, Attack, DamageBlock, DamageEffect, FocusCasting,
    FreeAction, InnateCasting, Item, ItemKind, Monster, Movement, Passive, PreparationType,
    PreparedCasting, PreparedSlot, Price, Reaction, Resistance, RitualData, Saves, Sense, Skill,
    SkillSpecial, Slot, Spell, SpellArea, SpellCasting, SpellCastingContainer, SpellDefense,
    SpellDuration, SpellUse, SpellUses, SpontaneousCasting, TraitBlock,
};
pub use error::DomainError;
pub use game_systems::{creature_xp, encounter_budget, Difficulty};
