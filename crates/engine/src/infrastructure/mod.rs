//! Infrastructure implementations.
//!
//! Contains the import pipeline and the port adapters around it.

pub mod clock;
pub mod config;
pub mod content_sources;
pub mod diagnostics;
pub mod importers;
pub mod ports;
