//! Test fixtures loader for JSON fixture files.
//!
//! Fixtures live in the crate's `test_data/` directory.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::load_fixture;
//!
//! #[test]
//! fn naga_has_jaws() {
//!     let document: serde_json::Value = load_fixture("monsters/guardian_naga.json");
//!     // ... test logic
//! }
//! ```

use std::path::PathBuf;

/// Absolute path of a fixture under `test_data/`.
pub fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(path)
}

/// Load a JSON fixture from test_data/ directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read or parsed.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let fixture_path = fixture_path(path);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture '{}': {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Failed to parse fixture '{}': {}",
            fixture_path.display(),
            e
        )
    })
}
