pub mod backend;
pub mod client;
pub mod harvester;
pub mod page;

pub use backend::{ClusterInfo, SearchBackend};
pub use client::ElasticsearchClient;
pub use harvester::{HarvestSummary, Harvester};
pub use page::{CursorToken, ResultPage, SearchError};
