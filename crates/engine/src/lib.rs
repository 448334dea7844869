//! Bestiary Engine library.
//!
//! Imports creature stat blocks from Foundry-style actor documents.
//!
//! ## Structure
//!
//! - `infrastructure/` - Import pipeline, ports and adapters (sources, diagnostics, config)
//! - `use_cases/` - Bestiary sync and queries

pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for loading representative documents.
#[cfg(test)]
pub mod test_fixtures;

pub use infrastructure::importers::{ImportError, MonsterImporter};
pub use use_cases::bestiary::{BestiaryService, SyncReport};
