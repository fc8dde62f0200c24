use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured context attached to an error (HTTP status, raw response, ...).
pub type ErrorContext = BTreeMap<String, serde_json::Value>;

/// Unified error type for every ClouDNS API call.
///
/// Business-level failures (`"status": "Failed"` in a 200 response) are
/// classified into [`Authentication`](Self::Authentication),
/// [`Validation`](Self::Validation) or [`Generic`](Self::Generic). Transport
/// failures and non-200 responses always surface as `Generic`, except a
/// final HTTP 429 which becomes [`RateLimit`](Self::RateLimit).
///
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClouDnsError {
    /// The API rejected the credentials.
    Authentication {
        /// Human-readable description, usually the API's `statusDescription`
        message: String,
        /// Extra diagnostics such as `status` or the raw `response`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        context: ErrorContext,
    },

    /// A request parameter is missing, invalid or wrong.
    Validation {
        /// Human-readable description, usually the API's `statusDescription`
        message: String,
        /// Extra diagnostics such as `status` or the raw `response`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        context: ErrorContext,
    },

    /// The addressed zone or record does not exist.
    ///
    /// Never produced by response classification; available to callers that
    /// detect missing resources themselves.
    ResourceNotFound {
        /// Human-readable description, usually the API's `statusDescription`
        message: String,
        /// `zone`, `record`...
        resource_type: Option<String>,
        /// Zone name or record ID
        resource_id: Option<String>,
        /// Extra diagnostics such as `status` or the raw `response`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        context: ErrorContext,
    },

    /// The API rate limit was exceeded and retries did not help.
    RateLimit {
        /// Human-readable description, usually the API's `statusDescription`
        message: String,
        /// Seconds to wait, from the `Retry-After` header.
        retry_after: Option<u64>,
        /// Extra diagnostics such as `status` or the raw `response`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        context: ErrorContext,
    },

    /// Everything else: transport failures, unexpected HTTP status, parse
    /// failures and unclassified business errors.
    Generic {
        /// Human-readable description, usually the API's `statusDescription`
        message: String,
        /// Extra diagnostics such as `status` or the raw `response`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        context: ErrorContext,
    },
}

impl ClouDnsError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn resource_not_found(
        message: impl Into<String>,
        resource_type: Option<String>,
        resource_id: Option<String>,
    ) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
            resource_type,
            resource_id,
            context: ErrorContext::new(),
        }
    }

    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
            context: ErrorContext::new(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    /// Adds one entry to the error's context.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context_mut().insert(key.into(), value.into());
        self
    }

    /// Human-readable message, as returned by the API when available.
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Validation { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Generic { message, .. } => message,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Authentication { context, .. }
            | Self::Validation { context, .. }
            | Self::ResourceNotFound { context, .. }
            | Self::RateLimit { context, .. }
            | Self::Generic { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Authentication { context, .. }
            | Self::Validation { context, .. }
            | Self::ResourceNotFound { context, .. }
            | Self::RateLimit { context, .. }
            | Self::Generic { context, .. } => context,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether the failure is caused by caller input rather than the service.
    ///
    /// Expected failures are logged at `warn`, the rest at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Validation { .. } | Self::ResourceNotFound { .. }
        )
    }
}

impl std::fmt::Display for ClouDnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication { message, .. } => {
                write!(f, "[cloudns] Authentication error: {message}")
            }
            Self::Validation { message, .. } => {
                write!(f, "[cloudns] Validation error: {message}")
            }
            Self::ResourceNotFound {
                message,
                resource_type,
                resource_id,
                ..
            } => match (resource_type, resource_id) {
                (Some(kind), Some(id)) => {
                    write!(f, "[cloudns] {kind} '{id}' not found: {message}")
                }
                _ => write!(f, "[cloudns] Not found: {message}"),
            },
            Self::RateLimit {
                message,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[cloudns] Rate limited (retry after {secs}s): {message}")
                } else {
                    write!(f, "[cloudns] Rate limited: {message}")
                }
            }
            Self::Generic { message, .. } => write!(f, "[cloudns] {message}"),
        }
    }
}

impl std::error::Error for ClouDnsError {}

/// Convenience type alias for `Result<T, ClouDnsError>`.
pub type Result<T> = std::result::Result<T, ClouDnsError>;
