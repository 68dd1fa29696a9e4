use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("[{status}] {kind}: {reason}")]
    Backend {
        status: u16,
        kind: String,
        reason: String,
    },

    #[error("malformed search response: {0}")]
    MalformedResponse(String),

    #[error("page returned {documents} documents but no cursor to continue from")]
    MissingCursor { documents: usize },
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Opaque scroll handle returned by the backend.
///
/// Each response's token supersedes every earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CursorToken(String);

impl CursorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CursorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One request/response cycle worth of documents.
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    pub documents: Vec<serde_json::Value>,
    pub cursor: CursorToken,
    pub took: Duration,
    /// Server-side hit estimate. Only meaningful on the first page.
    pub total_hits: u64,
}

impl ResultPage {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// ===== Wire Types =====

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    #[serde(default)]
    took: u64,
    #[serde(default)]
    hits: Option<HitsEnvelope>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<serde_json::Value>,
}

/// 7.x reports `{"value": n, "relation": ".."}`, 6.x a bare integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        reason: String,
    },
    Plain(String),
}

impl ErrorDetail {
    fn into_error(self, status: u16) -> SearchError {
        match self {
            ErrorDetail::Structured { kind, reason } => SearchError::Backend {
                status,
                kind,
                reason,
            },
            ErrorDetail::Plain(reason) => SearchError::Backend {
                status,
                kind: "error".to_string(),
                reason,
            },
        }
    }
}

/// Turns a raw HTTP status and body into a page or a backend error.
///
/// A non-success status and an `error` object inside a success body are both
/// treated as backend failures.
pub fn parse_search_response(status: u16, body: &[u8]) -> Result<ResultPage> {
    if !(200..300).contains(&status) {
        return Err(parse_error_body(status, body));
    }

    let response: SearchResponse = serde_json::from_slice(body)?;

    if let Some(error) = response.error {
        return Err(error.into_error(status));
    }

    let hits = response
        .hits
        .ok_or_else(|| SearchError::MalformedResponse("missing 'hits' object".to_string()))?;

    Ok(ResultPage {
        total_hits: hits.total.as_ref().map(TotalHits::value).unwrap_or(0),
        documents: hits.hits,
        cursor: CursorToken::new(response.scroll_id.unwrap_or_default()),
        took: Duration::from_millis(response.took),
    })
}

/// Builds a backend error from an error response body, falling back to the raw text.
pub fn parse_error_body(status: u16, body: &[u8]) -> SearchError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.into_error(status),
        Err(_) => SearchError::Backend {
            status,
            kind: "unknown".to_string(),
            reason: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}
