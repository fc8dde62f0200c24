//! ClouDNS API client

mod http;

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{InMemoryResponseCache, ResponseCache};
use crate::config::{ClientConfig, ResponseFormat};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::retry::RetryPolicy;
use crate::services::{AccountService, RecordService, UtilityService, ZoneService};
use crate::transport::{HttpTransport, Transport};

/// ClouDNS API client
///
/// Cheap to clone; clones share configuration, transport and cache.
#[derive(Clone)]
pub struct ClouDnsClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) credentials: Credentials,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cache: Arc<dyn ResponseCache>,
    pub(crate) retry: RetryPolicy,
}

/// ClouDNS client builder
pub struct ClouDnsClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl ClouDnsClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            transport: None,
            cache: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = format;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry_times(mut self, retries: u32) -> Self {
        self.config.retry_times = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache_prefix = prefix.into();
        self
    }

    pub fn log_enabled(mut self, enabled: bool) -> Self {
        self.config.log_enabled = enabled;
        self
    }

    /// Uses a custom transport instead of the reqwest one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a custom (possibly shared) response cache.
    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<ClouDnsClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        let cache: Arc<dyn ResponseCache> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(InMemoryResponseCache::new()),
        };
        let retry = RetryPolicy::new(self.config.retry_times, self.config.retry_delay)
            .with_logging(self.config.log_enabled);

        Ok(ClouDnsClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                credentials: self.credentials,
                transport,
                cache,
                retry,
            }),
        })
    }
}

impl ClouDnsClient {
    /// Client with default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> ClouDnsClientBuilder {
        ClouDnsClientBuilder::new(credentials)
    }

    /// Client configured entirely from `CLOUDNS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::builder(Credentials::from_env()?)
            .config(ClientConfig::from_env()?)
            .build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    pub fn zones(&self) -> ZoneService<'_> {
        ZoneService::new(self)
    }

    pub fn records(&self) -> RecordService<'_> {
        RecordService::new(self)
    }

    pub fn account(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn utility(&self) -> UtilityService<'_> {
        UtilityService::new(self)
    }
}

impl std::fmt::Debug for ClouDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClouDnsClient")
            .field("config", &self.inner.config)
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}
