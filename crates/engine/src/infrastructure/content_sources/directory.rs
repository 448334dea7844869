//! Local directory of actor JSON documents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{validate_name, INDEX_FILE};
use crate::infrastructure::ports::{DocumentSource, SourceError};

/// Reads every `*.json` file directly inside one directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn list(&self) -> Result<Vec<String>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::DataFileNotFound(self.root.clone()));
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") && name != INDEX_FILE {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn fetch(&self, name: &str) -> Result<Value, SourceError> {
        validate_name(name)?;

        let path = self.root.join(name);
        if !path.exists() {
            return Err(SourceError::DataFileNotFound(path));
        }

        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn lists_json_documents_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zombie.json", "{}");
        write(dir.path(), "aboleth.json", "{}");
        write(dir.path(), "notes.txt", "not a document");
        write(dir.path(), INDEX_FILE, "[]");
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            source.list().await.unwrap(),
            vec!["aboleth.json", "zombie.json"]
        );
    }

    #[tokio::test]
    async fn fetch_decodes_document() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "naga.json", r#"{"name": "Guardian Naga", "items": []}"#);

        let source = DirectorySource::new(dir.path());
        let document = source.fetch("naga.json").await.unwrap();
        assert_eq!(document["name"], "Guardian Naga");
    }

    #[tokio::test]
    async fn fetch_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.json", "{ nope");
        let source = DirectorySource::new(dir.path());

        assert!(matches!(
            source.fetch("../secret.json").await,
            Err(SourceError::InvalidFilename(_))
        ));
        assert!(matches!(
            source.fetch("missing.json").await,
            Err(SourceError::DataFileNotFound(_))
        ));
        assert!(matches!(
            source.fetch("broken.json").await,
            Err(SourceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"));
        assert!(matches!(
            source.list().await,
            Err(SourceError::DataFileNotFound(_))
        ));
    }
}
