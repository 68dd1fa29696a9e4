use crate::query::{self, QueryRequest};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub address: String,
    pub username: String,
    pub password: String,
    #[serde(with = "super::duration::serde_format")]
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:9200".to_string(),
            username: "elasticsearch".to_string(),
            password: "secret".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub index: String,
    pub page_size: u32,
    #[serde(with = "super::duration::serde_format")]
    pub scroll: Duration,
    /// Restricts returned `_source` fields. `~` returns whole documents.
    pub source_filter: Option<Vec<String>>,
    pub pretty: bool,
    /// Query document to send instead of a built-in rule query.
    pub query_file: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: query::DEFAULT_INDEX.to_string(),
            page_size: query::DEFAULT_PAGE_SIZE,
            scroll: query::DEFAULT_SCROLL,
            source_filter: Some(vec![query::DEFAULT_SOURCE_FIELD.to_string()]),
            pretty: true,
            query_file: None,
        }
    }
}

impl SearchConfig {
    pub fn query_request(&self, body: Vec<u8>) -> QueryRequest {
        QueryRequest::new(body, self.index.clone())
            .with_page_size(self.page_size)
            .with_scroll(self.scroll)
            .with_source_filter(self.source_filter.clone())
            .with_pretty(self.pretty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// JSON pointer to the header list inside each hit.
    pub headers_pointer: String,
    pub on_decode_error: DecodeErrorStrategy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            headers_pointer: "/_source/httpRequest/headers".to_string(),
            on_decode_error: DecodeErrorStrategy::default(),
        }
    }
}

/// What to do when an `amplitude_id` cookie segment cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorStrategy {
    /// Abort the whole run.
    #[default]
    Strict,
    /// Log the failure, drop the segment and keep going.
    Lenient,
}
