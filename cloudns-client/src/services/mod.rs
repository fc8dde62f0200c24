//! Typed wrappers over individual API endpoints
//!
//! Services borrow the client and add no behavior of their own beyond
//! building parameters and decoding responses.

mod account;
mod record;
mod utility;
mod zone;

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClouDnsError, Result};
use crate::types::value_as_u64;

pub use account::AccountService;
pub use record::RecordService;
pub use utility::UtilityService;
pub use zone::ZoneService;

static BRACKETED_ID_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").ok());

/// Extracts the first bracketed numeric id from a status description,
/// e.g. `"The record was added successfully [123456]"` → `123456`.
pub fn extract_bracketed_id(description: &str) -> Option<u64> {
    BRACKETED_ID_RE
        .as_ref()?
        .captures(description)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ClouDnsError::generic(format!("Failed to decode response: {e}")))
}

/// Items of a list response.
///
/// ClouDNS returns either a JSON array or an object whose numeric keys hold
/// the items next to metadata such as `page` / `pages`. Numeric keys are
/// returned in numeric order.
fn numeric_entries<T: DeserializeOwned>(response: &Value) -> Result<Vec<T>> {
    match response {
        Value::Array(items) => items
            .iter()
            .filter(|v| v.is_object())
            .map(|v| decode(v.clone()))
            .collect(),
        Value::Object(map) => {
            let mut entries: Vec<(u64, &Value)> = map
                .iter()
                .filter(|(_, v)| v.is_object())
                .filter_map(|(k, v)| k.parse::<u64>().ok().map(|n| (n, v)))
                .collect();
            entries.sort_by_key(|(n, _)| *n);
            entries.into_iter().map(|(_, v)| decode(v.clone())).collect()
        }
        _ => Ok(Vec::new()),
    }
}

/// Numeric field of a response object, falling back to `default`.
fn field_u32(response: &Value, key: &str, default: u32) -> u32 {
    response
        .get(key)
        .and_then(value_as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}
