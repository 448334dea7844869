//! Bestiary use cases.
//!
//! Syncs creature documents from a source into assembled monsters and answers
//! queries over them.

mod bestiary_service;

pub use bestiary_service::{BestiaryError, BestiaryFilter, BestiaryService, SyncReport};
