//! Open Library client
//!
//! `GET /search.json?q=..&limit=..` for keyword search and
//! `GET {work key}.json` for work records.

use super::{MetadataSource, SearchResult, WorkDetails};
use crate::error::Result;
use crate::http::ensure_success;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchResult>,
}

/// Work descriptions are either a bare string or a typed text object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: String },
}

#[derive(Debug, Deserialize)]
struct WorkRecord {
    #[serde(default)]
    description: Option<Description>,
}

impl From<WorkRecord> for WorkDetails {
    fn from(record: WorkRecord) -> Self {
        Self {
            description: record.description.map(|d| match d {
                Description::Text(text) => text,
                Description::Typed { value } => value,
            }),
        }
    }
}

/// HTTP client for Open Library
#[derive(Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    pub fn new(http: reqwest::Client, base_url: &str, covers_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            covers_url: covers_url.trim_end_matches('/').to_string(),
        }
    }

    fn work_url(&self, key: &str) -> String {
        let key = key.trim_end_matches(".json");
        if key.starts_with('/') {
            format!("{}{}.json", self.base_url, key)
        } else {
            format!("{}/{}.json", self.base_url, key)
        }
    }
}

#[async_trait]
impl MetadataSource for OpenLibraryClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Searching Open Library for {:?} (limit {})", query, limit);

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let body: SearchResponse = ensure_success(response).await?.json().await?;
        Ok(body.docs)
    }

    async fn work(&self, key: &str) -> Result<Option<WorkDetails>> {
        let response = self.http.get(self.work_url(key)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("Work {} not found", key);
            return Ok(None);
        }

        let record: WorkRecord = ensure_success(response).await?.json().await?;
        Ok(Some(record.into()))
    }

    fn covers_base(&self) -> &str {
        &self.covers_url
    }
}
