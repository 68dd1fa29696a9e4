use super::backend::SearchBackend;
use super::page::{ResultPage, SearchError};
use crate::query::QueryRequest;
use std::time::Duration;

/// Totals for one completed harvest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Hit estimate reported with the first page.
    pub total_hits: u64,
    /// Request/response cycles issued, including the terminal empty page.
    pub requests: usize,
    /// Non-empty pages handed to the sink.
    pub pages: usize,
    pub documents: usize,
    /// Server-reported processing time summed over every cycle.
    pub took: Duration,
}

/// Drives the scroll protocol until the backend returns an empty page.
///
/// Every continuation uses the cursor returned by the immediately preceding
/// response. The first page's hit estimate is reported but never used to
/// decide when to stop.
pub struct Harvester<'a, B: SearchBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: SearchBackend + ?Sized> Harvester<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Fetches every page and hands each non-empty one to `on_page`, in order.
    ///
    /// Any backend failure ends the harvest. An error returned by `on_page`
    /// also ends it, without fetching further pages.
    pub async fn harvest<F, E>(
        &self,
        request: &QueryRequest,
        mut on_page: F,
    ) -> Result<HarvestSummary, E>
    where
        F: FnMut(ResultPage) -> Result<(), E>,
        E: From<SearchError>,
    {
        let mut page = self.backend.open_scroll(request).await?;

        let mut summary = HarvestSummary {
            total_hits: page.total_hits,
            requests: 1,
            took: page.took,
            ..Default::default()
        };

        tracing::debug!(
            total_hits = page.total_hits,
            hits = page.documents.len(),
            "Scroll opened"
        );

        while !page.is_empty() {
            let cursor = std::mem::take(&mut page.cursor);
            if cursor.is_empty() {
                return Err(SearchError::MissingCursor {
                    documents: page.documents.len(),
                }
                .into());
            }

            summary.pages += 1;
            summary.documents += page.documents.len();
            on_page(page)?;

            page = self.backend.continue_scroll(&cursor, request.scroll).await?;
            summary.requests += 1;
            summary.took += page.took;

            tracing::debug!(
                request = summary.requests,
                hits = page.documents.len(),
                documents = summary.documents,
                "Fetched scroll page"
            );
        }

        tracing::debug!(
            requests = summary.requests,
            documents = summary.documents,
            took_ms = summary.took.as_millis() as u64,
            "Scroll exhausted"
        );

        Ok(summary)
    }
}
