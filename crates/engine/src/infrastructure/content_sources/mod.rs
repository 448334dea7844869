//! Document sources for raw creature documents.
//!
//! Both adapters implement [`DocumentSource`](crate::infrastructure::ports::DocumentSource):
//! a local directory of JSON files, or a remote repository that publishes an
//! index of document names next to the documents themselves.

pub mod directory;
pub mod remote;

pub use directory::DirectorySource;
pub use remote::RemoteSource;

use crate::infrastructure::ports::SourceError;

/// Name of the index listing a remote repository's documents.
pub const INDEX_FILE: &str = "index.json";

/// Reject names that could escape the source root.
pub(crate) fn validate_name(name: &str) -> Result<(), SourceError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(SourceError::InvalidFilename(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_are_rejected() {
        for name in ["../etc/passwd", "naga.json/..", "foo/bar.json", "..\\windows", ""] {
            assert!(
                matches!(validate_name(name), Err(SourceError::InvalidFilename(_))),
                "{} should be rejected",
                name
            );
        }
        assert!(validate_name("guardian-naga.json").is_ok());
    }
}
