use super::page::{CursorToken, ResultPage, Result};
use crate::query::QueryRequest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A search service that can serve a large result set through a cursor.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs the query and returns the first page together with its cursor.
    async fn open_scroll(&self, request: &QueryRequest) -> Result<ResultPage>;

    /// Fetches the page following `cursor`, extending its lifetime by `keep_alive`.
    async fn continue_scroll(
        &self,
        cursor: &CursorToken,
        keep_alive: Duration,
    ) -> Result<ResultPage>;

    async fn cluster_info(&self) -> Result<ClusterInfo>;
}

// ===== Response Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    pub cluster_name: String,
    pub cluster_uuid: String,
    pub version: VersionInfo,
    #[serde(default)]
    pub tagline: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    pub number: String,
    pub build_flavor: String,
    pub build_type: String,
    pub build_hash: String,
    pub build_date: Option<DateTime<Utc>>,
    pub build_snapshot: bool,
    pub lucene_version: String,
    pub minimum_wire_compatibility_version: String,
    pub minimum_index_compatibility_version: String,
}
