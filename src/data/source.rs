//! Where the facility dataset is fetched from.

use crate::{data::record::{parse_records, records_from_values, FacilityRecord}, Error, Result};
use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client; built once so repeated reloads reuse the connection pool.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("parkmap/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
});

/// Anything that can produce the raw facility records
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<FacilityRecord>>;

    /// Human-readable origin for log lines
    fn describe(&self) -> String;
}

/// Dataset served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<FacilityRecord>> {
        log::info!("fetching facility dataset from {}", self.url);
        let response = HTTP_CLIENT.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Dataset(format!("HTTP {}", response.status())));
        }
        let raw: Vec<serde_json::Value> = response.json().await?;
        Ok(records_from_values(raw))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Dataset stored on local disk
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone)]
pub struct FileSource {
    path: std::path::PathBuf,
}

#[cfg(feature = "tokio-runtime")]
impl FileSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "tokio-runtime")]
#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Vec<FacilityRecord>> {
        log::info!("reading facility dataset from {}", self.path.display());
        let json = tokio::fs::read_to_string(&self.path).await?;
        parse_records(&json)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset already in memory, as JSON text
#[derive(Debug, Clone)]
pub struct StaticSource {
    json: String,
}

impl StaticSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<FacilityRecord>> {
        parse_records(&self.json)
    }

    fn describe(&self) -> String {
        format!("in-memory ({} bytes)", self.json.len())
    }
}

/// Several sources fetched concurrently and concatenated.
///
/// A failing part is logged and skipped; the fetch only fails when every part
/// does. Duplicate facilities across parts are merged by the normalizer.
pub struct MergedSource {
    parts: Vec<Box<dyn DatasetSource>>,
}

impl MergedSource {
    pub fn new(parts: Vec<Box<dyn DatasetSource>>) -> Self {
        Self { parts }
    }
}

#[async_trait]
impl DatasetSource for MergedSource {
    async fn fetch(&self) -> Result<Vec<FacilityRecord>> {
        let results = join_all(self.parts.iter().map(|part| part.fetch())).await;

        let mut records = Vec::new();
        let mut last_error = None;
        for (part, result) in self.parts.iter().zip(results) {
            match result {
                Ok(mut part_records) => records.append(&mut part_records),
                Err(e) => {
                    log::warn!("skipping dataset part {}: {}", part.describe(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if records.is_empty() => Err(e),
            _ => Ok(records),
        }
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.parts.iter().map(|p| p.describe()).collect();
        format!("merged [{}]", parts.join(", "))
    }
}
