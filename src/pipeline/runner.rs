use crate::extraction::{ExtractError, Extractor};
use crate::identity::IdentityRecord;
use crate::query::{QueryError, QueryRequest};
use crate::report::{aggregate, AggregationEntry};
use crate::search::{HarvestSummary, Harvester, SearchBackend, SearchError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that end a search run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Decoded identities in the order they were encountered.
    pub records: Vec<IdentityRecord>,
    /// Per-user counts, ranked.
    pub ranking: Vec<AggregationEntry>,
    pub harvest: HarvestSummary,
    /// Cookie segments skipped under the lenient strategy.
    pub skipped: usize,
}

/// Harvests every page, decodes identities page by page, then aggregates.
///
/// Nothing is returned unless the whole result set was harvested.
pub async fn run_search<B>(
    backend: &B,
    request: &QueryRequest,
    extractor: &Extractor,
) -> Result<SearchReport, PipelineError>
where
    B: SearchBackend + ?Sized,
{
    request.validate()?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    let harvest = Harvester::new(backend)
        .harvest(request, |page| -> Result<(), PipelineError> {
            let extraction = extractor.extract(&page.documents)?;
            skipped += extraction.skipped;
            records.extend(extraction.records);
            debug!(
                documents = page.documents.len(),
                records = records.len(),
                "Extracted page"
            );
            Ok(())
        })
        .await?;

    info!(
        total_hits = harvest.total_hits,
        requests = harvest.requests,
        documents = harvest.documents,
        took_ms = harvest.took.as_millis() as u64,
        records = records.len(),
        skipped,
        "Harvest complete"
    );

    let ranking = aggregate(&records);

    Ok(SearchReport {
        records,
        ranking,
        harvest,
        skipped,
    })
}
