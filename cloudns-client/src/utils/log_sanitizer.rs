//! Log sanitization utilities
//!
//! Keeps the API password out of request logs and caps response bodies.

use crate::credentials::AUTH_PASSWORD;
use crate::params::Params;

/// Maximum number of characters of a response body written to the log.
pub const TRUNCATE_LIMIT: usize = 1000;

/// Replacement for redacted values.
pub const REDACTED: &str = "***REDACTED***";

/// Header names (lowercase) whose values are never logged.
const SENSITIVE_HEADERS: [&str; 2] = ["authorization", AUTH_PASSWORD];

/// Truncates a response body to [`TRUNCATE_LIMIT`] characters for logging.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_for_log(s: &str) -> &str {
    match s.char_indices().nth(TRUNCATE_LIMIT) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Copies `headers`, replacing sensitive values with [`REDACTED`].
pub fn sanitize_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

/// Renders request parameters for logging with the password redacted.
pub fn sanitize_params(params: &Params) -> String {
    let mut redacted = params.clone();
    if redacted.contains_key(AUTH_PASSWORD) {
        redacted.insert(AUTH_PASSWORD, REDACTED);
    }
    redacted.to_query_string()
}
