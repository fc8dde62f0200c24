//! # cloudns-client
//!
//! Async client for the [ClouDNS](https://www.cloudns.net/) HTTP API.
//!
//! ClouDNS answers most business failures with HTTP 200 and a
//! `{"status":"Failed","statusDescription":"..."}` body. This crate hides
//! that behind a single request pipeline that injects credentials, retries
//! transient failures, caches successful reads and turns failure bodies into
//! typed errors.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! cloudns-client = "0.1"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloudns_client::{ClouDnsClient, Credentials, RowsPerPage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClouDnsClient::new(Credentials::new("1234", "password"))?;
//!
//!     // Typed services
//!     let page = client.zones().list(1, RowsPerPage::Thirty, None, None).await?;
//!     for zone in &page.zones {
//!         println!("{} ({} records)", zone.name, zone.records_count);
//!     }
//!
//!     // Raw endpoint access; `.json` is appended automatically
//!     let ip = client.get("/account/get-current-ip", Default::default()).await?;
//!     println!("{ip}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Creating Records
//!
//! ```rust,no_run
//! # use cloudns_client::*;
//! # async fn example(client: ClouDnsClient) -> Result<()> {
//! let request = CreateRecordRequest::new("example.com", RecordType::Mx, "", "mail.example.com")
//!     .with_ttl(Ttl::Hour1)
//!     .with_priority(10);
//! let record_id = client.records().create(&request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`ClouDnsClient::builder`] overrides individual settings;
//! [`ClouDnsClient::from_env`] reads credentials and settings from
//! `CLOUDNS_*` environment variables. See [`ClientConfig`] for defaults.
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ClouDnsError>`](ClouDnsError):
//!
//! - [`ClouDnsError::Authentication`] — credentials rejected
//! - [`ClouDnsError::Validation`] — missing or invalid input
//! - [`ClouDnsError::ResourceNotFound`] — the addressed resource does not exist
//! - [`ClouDnsError::RateLimit`] — HTTP 429 after retries were exhausted
//! - [`ClouDnsError::Generic`] — everything else (transport, HTTP status, parsing)
//!
//! Transport failures and HTTP 429/500/502/503/504 are retried with linear
//! backoff before an error is returned. Business failures are never retried.

mod cache;
mod classifier;
mod client;
mod config;
mod credentials;
mod error;
mod params;
mod retry;
mod services;
mod transport;
mod types;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export error types
pub use error::{ClouDnsError, ErrorContext, Result};

// Re-export the client and its configuration
pub use client::{ClouDnsClient, ClouDnsClientBuilder};
pub use config::{ClientConfig, ResponseFormat};
pub use credentials::{Credentials, IdentityKind};

// Re-export pipeline building blocks
pub use cache::{DEFAULT_MAX_ENTRIES, InMemoryResponseCache, ResponseCache, fingerprint};
pub use classifier::{classify, classify_response};
pub use params::{ParamValue, Params};
pub use retry::{RETRYABLE_STATUSES, RetryPolicy};
pub use transport::{
    HttpTransport, Method, Transport, TransportError, TransportRequest, TransportResponse,
};

// Re-export services
pub use services::{AccountService, RecordService, UtilityService, ZoneService, extract_bracketed_id};

// Re-export types
pub use types::{
    CaaValue, CreateRecordRequest, CreateZoneRequest, Record, RecordPage, RecordType,
    RecordUpdate, RowsPerPage, SshfpValue, TlsaValue, Ttl, WebRedirect, Zone, ZonePage, ZoneType,
};
