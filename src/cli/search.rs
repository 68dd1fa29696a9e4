use super::CliError;
use crate::config::duration::parse_duration;
use crate::config::types::{Config, DecodeErrorStrategy};
use crate::extraction::Extractor;
use crate::identity::IdentityRecord;
use crate::pipeline::run_search;
use crate::query::{parse_timestamp, QueryRule, QuerySource, TimeRange};
use crate::report::log_summary;
use crate::search::ElasticsearchClient;
use chrono::{DateTime, Utc};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Span searched when `--since` is not given.
const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Query json file to send instead of a built-in rule query
    #[arg(long, short = 'q', conflicts_with = "rule")]
    pub query: Option<PathBuf>,

    /// Built-in rule query
    #[arg(long, short = 'r', value_enum)]
    pub rule: Option<QueryRule>,

    /// Range start, "YYYY-MM-DD HH:MM:SS" (UTC)
    #[arg(long, short = 's')]
    pub since: Option<String>,

    /// Range end, "YYYY-MM-DD HH:MM:SS" (UTC)
    #[arg(long)]
    pub until: Option<String>,

    /// Index pattern to search
    #[arg(long)]
    pub index: Option<String>,

    /// Documents per scroll page
    #[arg(long)]
    pub size: Option<u32>,

    /// Scroll keep-alive, e.g. 5m
    #[arg(long, value_parser = parse_duration)]
    pub scroll: Option<Duration>,

    /// What to do with undecodable amplitude_id cookies
    #[arg(long, value_enum)]
    pub on_decode_error: Option<DecodeErrorStrategy>,
}

impl SearchArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(index) = &self.index {
            config.search.index = index.clone();
        }
        if let Some(size) = self.size {
            config.search.page_size = size;
        }
        if let Some(scroll) = self.scroll {
            config.search.scroll = scroll;
        }
        if let Some(query) = &self.query {
            config.search.query_file = Some(query.clone());
        }
        if let Some(strategy) = self.on_decode_error {
            config.extraction.on_decode_error = strategy;
        }
    }

    /// Picks the query body source: a file if one is configured, otherwise a rule query.
    pub fn query_source(
        &self,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<QuerySource, CliError> {
        if let Some(path) = &config.search.query_file {
            if self.rule.is_some() {
                return Err(CliError::Usage(
                    "--rule cannot be combined with a query file".to_string(),
                ));
            }
            return Ok(QuerySource::File(path.clone()));
        }

        let until = match &self.until {
            Some(value) => parse_timestamp(value)?,
            None => now,
        };
        let range = match &self.since {
            Some(value) => TimeRange {
                since: parse_timestamp(value)?,
                until,
            },
            None => TimeRange::ending_at(until, chrono::Duration::days(DEFAULT_LOOKBACK_DAYS)),
        };

        if range.since > range.until {
            return Err(CliError::Usage(
                "--since must not be later than --until".to_string(),
            ));
        }

        Ok(QuerySource::Rule {
            rule: self.rule.unwrap_or(QueryRule::MatchAll),
            range,
        })
    }
}

/// Runs the search command: harvest, decode, print the records, log the ranking.
pub async fn run(mut config: Config, args: SearchArgs) -> Result<(), CliError> {
    args.apply(&mut config);
    crate::config::parse::validate_config(&config)?;

    let source = args.query_source(&config, Utc::now())?;
    debug!(source = ?source, "Building query");
    let body = source.build_body()?;

    let request = config.search.query_request(body);
    let client = ElasticsearchClient::new(&config.backend)?;
    let extractor = Extractor::from_config(&config.extraction);

    info!(
        address = %client.base_url(),
        index = %request.index,
        strategy = ?extractor.strategy(),
        "Starting search"
    );

    let report = run_search(&client, &request, &extractor).await?;

    let stdout = std::io::stdout();
    write_records(&mut stdout.lock(), &report.records)?;

    info!(records = report.records.len(), users = report.ranking.len(), "Identity summary");
    log_summary(&report.ranking);

    Ok(())
}

/// Writes the records as one JSON array followed by a newline.
pub fn write_records<W: Write>(out: &mut W, records: &[IdentityRecord]) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, records)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
