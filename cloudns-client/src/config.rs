//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClouDnsError, Result};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudns.net";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_TIMES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_CACHE_PREFIX: &str = "cloudns_";

/// Response format requested from the API, appended to endpoints as an
/// extension.
///
/// `Xml` is accepted as configuration, but only JSON bodies can be parsed:
/// every request made with `Xml` fails with a generic error after the
/// transport returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    pub(crate) fn accept_header(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ResponseFormat {
    type Err = ClouDnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ClouDnsError::validation(format!(
                "Invalid response format '{other}', expected json or xml"
            ))),
        }
    }
}

/// Immutable settings shared by every request of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub response_format: ResponseFormat,
    /// Per-attempt transport timeout.
    pub timeout: Duration,
    /// Retries after the first attempt; `0` disables retrying.
    pub retry_times: u32,
    /// Base delay of the linear backoff.
    pub retry_delay: Duration,
    /// Caches successful GET responses.
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub cache_prefix: String,
    /// Emits request/response logs through the `log` facade.
    pub log_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            response_format: ResponseFormat::Json,
            timeout: DEFAULT_TIMEOUT,
            retry_times: DEFAULT_RETRY_TIMES,
            retry_delay: DEFAULT_RETRY_DELAY,
            cache_enabled: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            log_enabled: true,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from `CLOUDNS_*` environment variables.
    ///
    /// Unset variables keep their defaults. `CLOUDNS_TIMEOUT` and
    /// `CLOUDNS_CACHE_TTL` are seconds, `CLOUDNS_RETRY_DELAY` is milliseconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            base_url: get("CLOUDNS_BASE_URL").unwrap_or(defaults.base_url),
            response_format: get("CLOUDNS_RESPONSE_FORMAT")
                .map(|v| v.parse::<ResponseFormat>())
                .transpose()?
                .unwrap_or(defaults.response_format),
            timeout: parse_number(&lookup, "CLOUDNS_TIMEOUT")?
                .map_or(defaults.timeout, Duration::from_secs),
            retry_times: parse_number(&lookup, "CLOUDNS_RETRY_TIMES")?
                .map_or(Ok(defaults.retry_times), |v| {
                    u32::try_from(v).map_err(|_| invalid_var("CLOUDNS_RETRY_TIMES", &v.to_string()))
                })?,
            retry_delay: parse_number(&lookup, "CLOUDNS_RETRY_DELAY")?
                .map_or(defaults.retry_delay, Duration::from_millis),
            cache_enabled: parse_flag(&lookup, "CLOUDNS_CACHE_ENABLED", defaults.cache_enabled)?,
            cache_ttl: parse_number(&lookup, "CLOUDNS_CACHE_TTL")?
                .map_or(defaults.cache_ttl, Duration::from_secs),
            cache_prefix: lookup("CLOUDNS_CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            log_enabled: parse_flag(&lookup, "CLOUDNS_LOG_ENABLED", defaults.log_enabled)?,
        })
    }
}

fn invalid_var(key: &str, value: &str) -> ClouDnsError {
    ClouDnsError::validation(format!("Invalid value for {key}: '{value}'"))
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key).map(|v| v.trim().to_string()) {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| invalid_var(key, &v)),
    }
}

pub(crate) fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_var(key, &raw)),
    }
}
