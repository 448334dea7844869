//! Domain entities - creature stat blocks and everything in them

mod action;
mod attack;
mod item;
mod monster;
mod spell;
mod spellcasting;

pub use action::{Action, ActionType, FreeAction, Passive, Reaction};
pub use attack::{Attack, DamageBlock, DamageEffect};
pub use item::{Item, ItemKind, Price};
pub use monster::{
    AbilityScores, Monster, Movement, Resistance, Saves, Sense, Skill, SkillSpecial, TraitBlock,
};
pub use spell::{RitualData, Spell, SpellArea, SpellDefense, SpellDuration, SpellUses};
pub use spellcasting::{
    FocusCasting, InnateCasting, PreparationType, PreparedCasting, PreparedSlot, Slot,
    SpellCasting, SpellCastingContainer, SpellUse, SpontaneousCasting,
};
