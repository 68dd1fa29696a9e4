use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_INDEX: &str = "log-aws-waf-*";
pub const DEFAULT_PAGE_SIZE: u32 = 10_000;
pub const DEFAULT_SCROLL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SOURCE_FIELD: &str = "httpRequest.headers";

/// Layout accepted for `--since` / `--until`, interpreted as UTC.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to read query file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid timestamp '{value}': expected YYYY-MM-DD HH:MM:SS")]
    Timestamp { value: String },

    #[error("invalid query request: {0}")]
    Invalid(String),
}

/// Everything needed to open a scroll over the target indices.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Opaque query document sent as the search body.
    pub body: Vec<u8>,
    /// Index pattern, may contain wildcards.
    pub index: String,
    pub page_size: u32,
    /// How long the backend keeps the cursor alive between requests.
    pub scroll: Duration,
    pub source_filter: Option<Vec<String>>,
    pub pretty: bool,
}

impl QueryRequest {
    pub fn new(body: impl Into<Vec<u8>>, index: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            index: index.into(),
            page_size: DEFAULT_PAGE_SIZE,
            scroll: DEFAULT_SCROLL,
            source_filter: Some(vec![DEFAULT_SOURCE_FIELD.to_string()]),
            pretty: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_scroll(mut self, scroll: Duration) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_source_filter(mut self, fields: Option<Vec<String>>) -> Self {
        self.source_filter = fields;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page_size == 0 {
            return Err(QueryError::Invalid(
                "page size must be greater than zero".to_string(),
            ));
        }
        if self.index.trim().is_empty() {
            return Err(QueryError::Invalid(
                "index pattern must not be empty".to_string(),
            ));
        }
        if self.scroll.is_zero() {
            return Err(QueryError::Invalid(
                "scroll keep-alive must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Built-in WAF log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryRule {
    MatchAll,
    AmazonIpReputation,
    AnonymousIp,
}

impl QueryRule {
    fn terminating_rule_id(self) -> Option<&'static str> {
        match self {
            QueryRule::MatchAll => None,
            QueryRule::AmazonIpReputation => Some("AWS-AWSManagedRulesAmazonIpReputationList"),
            QueryRule::AnonymousIp => Some("AWS-AWSManagedRulesAnonymousIpList"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl TimeRange {
    /// The `span` leading up to `until`.
    pub fn ending_at(until: DateTime<Utc>, span: chrono::Duration) -> Self {
        Self {
            since: until - span,
            until,
        }
    }
}

/// Where the search body comes from.
#[derive(Debug, Clone)]
pub enum QuerySource {
    File(PathBuf),
    Rule { rule: QueryRule, range: TimeRange },
}

impl QuerySource {
    pub fn build_body(&self) -> Result<Vec<u8>, QueryError> {
        match self {
            QuerySource::File(path) => read_query_file(path),
            QuerySource::Rule { rule, range } => {
                Ok(rule_query(*rule, range).to_string().into_bytes())
            }
        }
    }
}

fn read_query_file(path: &Path) -> Result<Vec<u8>, QueryError> {
    tracing::debug!(path = %path.display(), "Reading query file");
    std::fs::read(path).map_err(|source| QueryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn rule_query(rule: QueryRule, range: &TimeRange) -> serde_json::Value {
    let mut filters = Vec::new();

    if let Some(rule_id) = rule.terminating_rule_id() {
        filters.push(json!({
            "match_phrase": { "ruleGroupList.terminatingRule.ruleId": rule_id }
        }));
        filters.push(json!({
            "match_phrase": { "ruleGroupList.terminatingRule.action": "BLOCK" }
        }));
    }

    filters.push(json!({
        "range": {
            "@timestamp": {
                "gte": format_timestamp(range.since),
                "lte": format_timestamp(range.until),
                "format": "strict_date_optional_time"
            }
        }
    }));

    json!({
        "query": {
            "bool": {
                "must": [{ "match_all": {} }],
                "filter": filters
            }
        },
        "sort": ["_doc"]
    })
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parses `YYYY-MM-DD HH:MM:SS` as a UTC instant.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, QueryError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_LAYOUT)
        .map(|naive| naive.and_utc())
        .map_err(|_| QueryError::Timestamp {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn range() -> TimeRange {
        TimeRange {
            since: parse_timestamp("2020-12-23 13:04:05").unwrap(),
            until: parse_timestamp("2020-12-23 14:15:16").unwrap(),
        }
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2020-12-23 13:04:05").unwrap();
        assert_eq!(format_timestamp(ts), "2020-12-23T13:04:05Z");
    }

    #[test]
    fn test_parse_timestamp_rejects_other_layouts() {
        assert!(parse_timestamp("2020-12-23T13:04:05Z").is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_match_all_query_has_time_range() {
        let body = QuerySource::Rule {
            rule: QueryRule::MatchAll,
            range: range(),
        }
        .build_body()
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let filters = value["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 1);
        let ts = &filters[0]["range"]["@timestamp"];
        assert_eq!(ts["gte"], "2020-12-23T13:04:05Z");
        assert_eq!(ts["lte"], "2020-12-23T14:15:16Z");
        assert_eq!(value["sort"][0], "_doc");
    }

    #[test]
    fn test_rule_query_filters_on_terminating_rule() {
        let body = QuerySource::Rule {
            rule: QueryRule::AnonymousIp,
            range: range(),
        }
        .build_body()
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let filters = value["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(
            filters[0]["match_phrase"]["ruleGroupList.terminatingRule.ruleId"],
            "AWS-AWSManagedRulesAnonymousIpList"
        );
    }

    #[test]
    fn test_query_file_is_passed_through() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"query":{"match_all":{}}}"#).unwrap();

        let body = QuerySource::File(file.path().to_path_buf())
            .build_body()
            .unwrap();
        assert_eq!(body, br#"{"query":{"match_all":{}}}"#);
    }

    #[test]
    fn test_missing_query_file() {
        let result = QuerySource::File(PathBuf::from("/nonexistent/escli/query.json")).build_body();
        assert!(matches!(result, Err(QueryError::Io { .. })));
    }

    #[test]
    fn test_request_defaults_and_validation() {
        let request = QueryRequest::new("{}", DEFAULT_INDEX);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.scroll, DEFAULT_SCROLL);
        assert!(request.validate().is_ok());

        assert!(request.clone().with_page_size(0).validate().is_err());
        assert!(QueryRequest::new("{}", " ").validate().is_err());
        assert!(request.with_scroll(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_time_range_ending_at() {
        let until = parse_timestamp("2020-12-25 01:26:52").unwrap();
        let range = TimeRange::ending_at(until, chrono::Duration::days(7));
        assert_eq!(format_timestamp(range.since), "2020-12-18T01:26:52Z");
    }
}
