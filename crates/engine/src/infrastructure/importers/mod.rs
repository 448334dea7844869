//! Content importers.
//!
//! Turns raw Foundry-style actor documents into [`bestiary_domain::Monster`]s.
//! The pipeline runs leaves first:
//!
//! - `extract` / `sanitize`: field access with defaults, rules text cleanup
//! - `parsers`: one decoder per item kind
//! - `classify`: route each item record to its decoder
//! - `resolve`: link spells into their spellcasting entries
//! - `foundry`: assemble the monster

mod classify;
mod extract;
mod foundry;
mod parsers;
mod resolve;
mod sanitize;

pub use classify::{classify, classify_all, ClassifiedItem, ClassifiedItems};
pub use foundry::{ImportError, MonsterImporter};
pub use resolve::{resolve_spells, Resolution, ResolutionIssue};
pub use sanitize::sanitize;
