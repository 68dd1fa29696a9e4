use super::record::IdentityRecord;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Cookie segments whose text contains this marker carry an identity payload.
pub const IDENTITY_COOKIE_MARKER: &str = "amplitude_id";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode amplitude_id value as base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to parse amplitude_id payload as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a lenient decode: the last record that decoded cleanly plus every
/// segment failure that was skipped on the way.
#[derive(Debug, Default)]
pub struct LenientDecode {
    pub record: IdentityRecord,
    pub diagnostics: Vec<DecodeError>,
}

/// Decodes the identity carried by a `cookie` header value.
///
/// Segments are separated by `;`. Every segment containing `amplitude_id` is
/// decoded into a fresh record; when several segments match, the last one wins.
/// A cookie without such a segment yields the zero-value record. The first
/// failing segment aborts the decode.
pub fn decode_cookie(cookie: &str) -> Result<IdentityRecord, DecodeError> {
    identity_segments(cookie).try_fold(IdentityRecord::default(), |_, segment| {
        decode_segment(segment)
    })
}

/// Same scan as [`decode_cookie`], but a failing segment is recorded and skipped.
pub fn decode_cookie_lenient(cookie: &str) -> LenientDecode {
    identity_segments(cookie).fold(LenientDecode::default(), |mut acc, segment| {
        match decode_segment(segment) {
            Ok(record) => acc.record = record,
            Err(e) => acc.diagnostics.push(e),
        }
        acc
    })
}

fn identity_segments(cookie: &str) -> impl Iterator<Item = &str> {
    cookie
        .split(';')
        .filter(|segment| segment.contains(IDENTITY_COOKIE_MARKER))
}

fn decode_segment(segment: &str) -> Result<IdentityRecord, DecodeError> {
    let encoded = value_after_first_equal(segment);
    let decoded = general_purpose::STANDARD.decode(encoded)?;
    let record = serde_json::from_slice(&decoded)?;
    Ok(record)
}

/// Returns everything after the first `=`, or "" when there is none.
fn value_after_first_equal(segment: &str) -> &str {
    segment
        .split_once('=')
        .map(|(_, value)| value)
        .unwrap_or_default()
}
