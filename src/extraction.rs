use crate::config::types::{DecodeErrorStrategy, ExtractionConfig};
use crate::identity::{decode_cookie, decode_cookie_lenient, DecodeError, IdentityRecord};
use serde_json::Value;
use thiserror::Error;

/// Header name carrying the cookie string. Matched exactly.
pub const COOKIE_HEADER: &str = "cookie";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document {document}, header {header}: {source}")]
    Decode {
        document: usize,
        header: usize,
        #[source]
        source: DecodeError,
    },
}

/// Identities decoded from one page, in document then header order.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<IdentityRecord>,
    /// Cookie segments dropped under the lenient strategy.
    pub skipped: usize,
}

/// Maps raw result documents to decoded identity records.
#[derive(Debug, Clone)]
pub struct Extractor {
    headers_pointer: String,
    strategy: DecodeErrorStrategy,
}

impl Extractor {
    pub fn new(headers_pointer: impl Into<String>, strategy: DecodeErrorStrategy) -> Self {
        Self {
            headers_pointer: headers_pointer.into(),
            strategy,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.headers_pointer.clone(), config.on_decode_error)
    }

    pub fn strategy(&self) -> DecodeErrorStrategy {
        self.strategy
    }

    /// Decodes every cookie header of every document.
    ///
    /// Under [`DecodeErrorStrategy::Strict`] the first decode failure aborts the
    /// whole page and nothing from it is returned.
    pub fn extract(&self, documents: &[Value]) -> Result<PageExtraction, ExtractError> {
        let mut extraction = PageExtraction::default();

        for (doc_idx, document) in documents.iter().enumerate() {
            for (header_idx, cookie) in self.cookie_values(document) {
                match self.strategy {
                    DecodeErrorStrategy::Strict => {
                        let record =
                            decode_cookie(cookie).map_err(|source| ExtractError::Decode {
                                document: doc_idx,
                                header: header_idx,
                                source,
                            })?;
                        push_non_empty(&mut extraction.records, record);
                    }
                    DecodeErrorStrategy::Lenient => {
                        let outcome = decode_cookie_lenient(cookie);
                        for error in &outcome.diagnostics {
                            tracing::warn!(
                                document = doc_idx,
                                header = header_idx,
                                error = %error,
                                "Skipping undecodable amplitude_id segment"
                            );
                        }
                        extraction.skipped += outcome.diagnostics.len();
                        push_non_empty(&mut extraction.records, outcome.record);
                    }
                }
            }
        }

        Ok(extraction)
    }

    /// Cookie header values of one document, paired with the header's position.
    fn cookie_values<'d>(
        &self,
        document: &'d Value,
    ) -> impl Iterator<Item = (usize, &'d str)> {
        document
            .pointer(&self.headers_pointer)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .enumerate()
            .filter(|(_, header)| {
                header.get("name").and_then(Value::as_str) == Some(COOKIE_HEADER)
            })
            .filter_map(|(idx, header)| {
                header
                    .get("value")
                    .and_then(Value::as_str)
                    .map(|value| (idx, value))
            })
    }
}

fn push_non_empty(records: &mut Vec<IdentityRecord>, record: IdentityRecord) {
    if !record.is_empty() {
        records.push(record);
    }
}
