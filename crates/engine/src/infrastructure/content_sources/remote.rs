//! Remote repository of actor JSON documents over HTTP.
//!
//! The repository publishes `index.json` (a list of document names) and each
//! document at `<base>/<name>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{validate_name, INDEX_FILE};
use crate::infrastructure::ports::{DocumentSource, SourceError};

/// Default request timeout for remote fetches.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, SourceError> {
        let url = self.url(name);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND && name == INDEX_FILE {
            return Err(SourceError::IndexNotFound(url));
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Remote(format!(
                "GET {} returned {}: {}",
                url, status, error_text
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentSource for RemoteSource {
    async fn list(&self) -> Result<Vec<String>, SourceError> {
        let names: Vec<String> = self.get_json(INDEX_FILE).await?;
        Ok(names)
    }

    async fn fetch(&self, name: &str) -> Result<Value, SourceError> {
        validate_name(name)?;
        self.get_json(name).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slash() {
        let source = RemoteSource::new("https://example.org/bestiary/");
        assert_eq!(source.describe(), "https://example.org/bestiary");
        assert_eq!(source.url(INDEX_FILE), "https://example.org/bestiary/index.json");
    }

    #[tokio::test]
    async fn fetch_rejects_traversal_before_any_request() {
        let source = RemoteSource::new("http://127.0.0.1:9");
        assert!(matches!(
            source.fetch("../admin").await,
            Err(SourceError::InvalidFilename(_))
        ));
    }
}
