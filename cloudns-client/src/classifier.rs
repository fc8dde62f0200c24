//! Business-failure classification
//!
//! ClouDNS answers most failures with HTTP 200 and a body like
//! `{"status":"Failed","statusDescription":"..."}`. There are no error codes,
//! so the description text is matched against an ordered rule list.

use serde_json::Value;

use crate::error::ClouDnsError;

/// `status` value marking a business-level failure.
pub const FAILED_STATUS: &str = "Failed";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Maps a failure description to a typed error.
///
/// Rules, first match wins (case-insensitive substring):
/// 1. `authentication` → [`ClouDnsError::Authentication`]
/// 2. `missing`, `invalid` or `wrong` → [`ClouDnsError::Validation`]
/// 3. anything else → [`ClouDnsError::Generic`]
///
/// A missing description yields a generic `"Unknown error"`.
pub fn classify(description: Option<&str>) -> ClouDnsError {
    let Some(message) = description else {
        return ClouDnsError::generic(UNKNOWN_ERROR);
    };

    let lower = message.to_lowercase();
    if lower.contains("authentication") {
        ClouDnsError::authentication(message)
    } else if ["missing", "invalid", "wrong"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        ClouDnsError::validation(message)
    } else {
        ClouDnsError::generic(message)
    }
}

/// Returns the classified error when `body` reports `"status": "Failed"`.
///
/// The raw body is kept in the error context under `response`.
pub fn classify_response(body: &Value) -> Option<ClouDnsError> {
    if body.get("status").and_then(Value::as_str) != Some(FAILED_STATUS) {
        return None;
    }

    let description = body.get("statusDescription").and_then(Value::as_str);
    Some(classify(description).with_context("response", body.clone()))
}
