//! Game system rules that operate on plain numbers.
//!
//! # Supported Systems
//!
//! - Pathfinder 2e (`pf2e`): encounter XP budgets

pub mod pf2e;

pub use pf2e::{creature_xp, encounter_budget, Difficulty, STANDARD_PARTY_SIZE};
