//! ClouDNS request pipeline

use serde_json::Value;

use crate::cache::fingerprint;
use crate::classifier::classify_response;
use crate::config::ResponseFormat;
use crate::error::{ClouDnsError, Result};
use crate::params::Params;
use crate::transport::{Method, TransportRequest};
use crate::utils::log_sanitizer::{sanitize_headers, sanitize_params, truncate_for_log};

use super::ClouDnsClient;

const USER_AGENT: &str = concat!("cloudns-client/", env!("CARGO_PKG_VERSION"));

/// Strips leading slashes and appends the format extension when the endpoint
/// has none, e.g. `/dns/list-zones` → `dns/list-zones.json`.
pub(crate) fn format_endpoint(endpoint: &str, format: ResponseFormat) -> String {
    let trimmed = endpoint.trim_start_matches('/');
    if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}.{}", format.extension())
    }
}

impl ClouDnsClient {
    /// GET request. Successful responses are cached when caching is enabled.
    pub async fn get(&self, endpoint: &str, params: Params) -> Result<Value> {
        self.execute(Method::Get, endpoint, params).await
    }

    /// POST request (form-encoded). Never cached.
    pub async fn post(&self, endpoint: &str, params: Params) -> Result<Value> {
        self.execute(Method::Post, endpoint, params).await
    }

    /// Invalidates cached responses.
    ///
    /// `None` empties the cache; `Some(pattern)` removes entries whose key
    /// starts with the configured prefix followed by `pattern`.
    pub async fn clear_cache(&self, pattern: Option<&str>) {
        let cache = &self.inner.cache;
        match pattern {
            None => cache.invalidate(None).await,
            Some(pattern) => {
                let prefix = format!("{}{pattern}", self.inner.config.cache_prefix);
                cache.invalidate(Some(&prefix)).await;
            }
        }
    }

    pub(crate) async fn execute(&self, method: Method, endpoint: &str, params: Params) -> Result<Value> {
        let inner = &self.inner;
        let config = &inner.config;
        let log_enabled = config.log_enabled;

        let mut params = params;
        params.merge(inner.credentials.auth_params());

        let endpoint = format_endpoint(endpoint, config.response_format);
        let cacheable = method == Method::Get && config.cache_enabled;
        let cache_key = fingerprint(&config.cache_prefix, method, &endpoint, &params);

        if cacheable && let Some(cached) = inner.cache.get(&cache_key).await {
            if log_enabled {
                log::debug!("[cloudns] Cache hit: {method} {endpoint}");
            }
            return Ok(cached);
        }

        let request = TransportRequest {
            method,
            endpoint,
            params: params.to_pairs(),
            headers: vec![
                (
                    "Accept".to_string(),
                    config.response_format.accept_header().to_string(),
                ),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ],
        };

        if log_enabled {
            log::debug!(
                "[cloudns] {method} {}/{}",
                config.base_url.trim_end_matches('/'),
                request.endpoint
            );
            log::debug!("[cloudns] Params: {}", sanitize_params(&params));
            log::debug!("[cloudns] Headers: {:?}", sanitize_headers(&request.headers));
        }

        let transport = &inner.transport;
        let response = inner
            .retry
            .run(|| transport.send(&request))
            .await
            .map_err(|e| {
                if log_enabled {
                    log::error!("[cloudns] HTTP request failed: {e}");
                }
                ClouDnsError::generic(format!("HTTP request failed: {e}"))
            })?;

        if log_enabled {
            log::debug!("[cloudns] Response Status: {}", response.status);
            log::debug!("[cloudns] Response Body: {}", truncate_for_log(&response.body));
        }

        if response.status != 200 {
            let message = format!(
                "API request failed with status {}: {}",
                response.status, response.body
            );
            let error = if response.status == 429 {
                ClouDnsError::rate_limit(message, response.retry_after)
            } else {
                ClouDnsError::generic(message)
            };
            if log_enabled {
                log::error!("[cloudns] {}", truncate_for_log(error.message()));
            }
            return Err(error.with_context("status", response.status));
        }

        let body: Value = match config.response_format {
            ResponseFormat::Json => serde_json::from_str(&response.body).map_err(|e| {
                if log_enabled {
                    log::error!("[cloudns] JSON parse error: {e}");
                }
                ClouDnsError::generic(format!("Failed to parse JSON response: {e}"))
            })?,
            ResponseFormat::Xml => {
                return Err(ClouDnsError::generic("XML response format not yet implemented"));
            }
        };

        if let Some(error) = classify_response(&body) {
            if log_enabled {
                if error.is_expected() {
                    log::warn!("[cloudns] API error: {}", error.message());
                } else {
                    log::error!("[cloudns] API error: {}", error.message());
                }
            }
            return Err(error);
        }

        if cacheable {
            inner.cache.put(cache_key, body.clone(), config.cache_ttl).await;
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::cache::{InMemoryResponseCache, ResponseCache};
    use crate::credentials::Credentials;
    use crate::test_utils::ScriptedTransport;
    use crate::transport::{TransportError, TransportResponse};

    fn client_with(transport: &Arc<ScriptedTransport>) -> ClouDnsClient {
        ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .log_enabled(false)
            .build()
            .unwrap()
    }

    fn ok(body: &str) -> TransportResponse {
        TransportResponse::new(200, body)
    }

    // ---- format_endpoint ----

    #[test]
    fn endpoint_normalization() {
        let json = ResponseFormat::Json;
        assert_eq!(format_endpoint("/dns/list-zones", json), "dns/list-zones.json");
        assert_eq!(format_endpoint("dns/list-zones", json), "dns/list-zones.json");
        assert_eq!(format_endpoint("//dns/records.json", json), "dns/records.json");
        assert_eq!(format_endpoint("dns/export.xml", json), "dns/export.xml");
        assert_eq!(
            format_endpoint("dns/list-zones", ResponseFormat::Xml),
            "dns/list-zones.xml"
        );
    }

    // ---- auth / request shape ----

    #[tokio::test]
    async fn auth_params_are_injected_and_win() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok(r#"{"status":"Success"}"#)).await;
        let client = client_with(&transport);

        client
            .get(
                "/dns/list-zones",
                Params::new().with("auth-id", "spoofed").with("page", 1),
            )
            .await
            .unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.endpoint, "dns/list-zones.json");
        assert!(request.params.contains(&("auth-id".into(), "1234".into())));
        assert!(request.params.contains(&("auth-password".into(), "secret".into())));
        assert!(request.params.contains(&("page".into(), "1".into())));
        assert!(!request.params.iter().any(|(_, v)| v == "spoofed"));
        assert!(
            request
                .headers
                .iter()
                .any(|(k, v)| k == "Accept" && v == "application/json")
        );
    }

    // ---- caching ----

    #[tokio::test]
    async fn identical_get_is_served_from_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok(r#"{"status":"Success","n":1}"#)).await;
        let client = client_with(&transport);

        let params = Params::new().with("domain-name", "example.com");
        let first = client.get("dns/records", params.clone()).await.unwrap();
        let second = client.get("dns/records", params).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls().await, 1);
    }

    #[tokio::test]
    async fn post_is_never_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok(r#"{"status":"Success"}"#)).await;
        transport.push_response(ok(r#"{"status":"Success"}"#)).await;
        let client = client_with(&transport);

        client.post("dns/add-record", Params::new()).await.unwrap();
        client.post("dns/add-record", Params::new()).await.unwrap();

        assert_eq!(transport.calls().await, 2);
        assert_eq!(transport.requests().await[0].method, Method::Post);
    }

    #[tokio::test]
    async fn cache_disabled_always_hits_transport() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok("{}")).await;
        transport.push_response(ok("{}")).await;
        let client = ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .cache_enabled(false)
            .log_enabled(false)
            .build()
            .unwrap();

        client.get("dns/records", Params::new()).await.unwrap();
        client.get("dns/records", Params::new()).await.unwrap();
        assert_eq!(transport.calls().await, 2);
    }

    #[tokio::test]
    async fn cache_entry_expires_after_ttl() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok(r#"{"v":1}"#)).await;
        transport.push_response(ok(r#"{"v":2}"#)).await;
        let client = ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .cache_ttl(Duration::from_millis(100))
            .log_enabled(false)
            .build()
            .unwrap();

        assert_eq!(client.get("x", Params::new()).await.unwrap(), json!({"v": 1}));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(client.get("x", Params::new()).await.unwrap(), json!({"v": 2}));
        assert_eq!(transport.calls().await, 2);
    }

    #[tokio::test]
    async fn expired_reads_do_not_accumulate() {
        let cache = Arc::new(InMemoryResponseCache::new());
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..100 {
            transport.push_response(ok(r#"{"status":"Success"}"#)).await;
        }
        let client = ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .cache(cache.clone())
            .cache_ttl(Duration::from_millis(50))
            .log_enabled(false)
            .build()
            .unwrap();

        for id in 0..100 {
            client
                .get("dns/get-record", Params::new().with("record-id", id))
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 100);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn business_failure_is_not_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        let failed = r#"{"status":"Failed","statusDescription":"Invalid domain name"}"#;
        transport.push_response(ok(failed)).await;
        transport.push_response(ok(failed)).await;
        let client = client_with(&transport);

        for _ in 0..2 {
            let err = client.get("dns/records", Params::new()).await.unwrap_err();
            assert!(matches!(err, ClouDnsError::Validation { .. }));
        }
        assert_eq!(transport.calls().await, 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok(r#"{"v":1}"#)).await;
        transport.push_response(ok(r#"{"v":2}"#)).await;
        let client = client_with(&transport);

        client.get("x", Params::new()).await.unwrap();
        client.clear_cache(None).await;
        assert_eq!(client.get("x", Params::new()).await.unwrap(), json!({"v": 2}));
    }

    #[tokio::test]
    async fn clear_cache_with_pattern_uses_prefix() {
        let cache = Arc::new(InMemoryResponseCache::new());
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok("{}")).await;
        transport.push_response(ok("{}")).await;
        let client = ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .cache(cache.clone())
            .log_enabled(false)
            .build()
            .unwrap();

        client.get("x", Params::new()).await.unwrap();
        cache
            .put("foreign_key".into(), json!(1), Duration::from_secs(60))
            .await;
        assert_eq!(cache.len().await, 2);

        client.clear_cache(Some("")).await;
        client.get("x", Params::new()).await.unwrap();
        assert_eq!(transport.calls().await, 2);
        assert_eq!(cache.get("foreign_key").await, Some(json!(1)));
    }

    // ---- failures ----

    #[tokio::test]
    async fn authentication_failure_is_classified() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_response(ok(
                r#"{"status":"Failed","statusDescription":"Invalid authentication, incorrect auth-id or auth-password."}"#,
            ))
            .await;
        let client = client_with(&transport);

        let err = client.get("dns/login", Params::new()).await.unwrap_err();
        assert!(matches!(err, ClouDnsError::Authentication { .. }));
        assert!(err.context().contains_key("response"));
    }

    #[tokio::test]
    async fn malformed_json() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok("not json")).await;
        let client = client_with(&transport);

        let err = client.get("x", Params::new()).await.unwrap_err();
        assert!(matches!(err, ClouDnsError::Generic { .. }));
        assert!(err.message().starts_with("Failed to parse JSON response:"));
    }

    #[tokio::test]
    async fn xml_format_fails_deterministically() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ok("<xml/>")).await;
        let client = ClouDnsClient::builder(Credentials::new("1234", "secret"))
            .transport(transport.clone())
            .response_format(ResponseFormat::Xml)
            .log_enabled(false)
            .build()
            .unwrap();

        let err = client.get("dns/list-zones", Params::new()).await.unwrap_err();
        assert_eq!(err.message(), "XML response format not yet implemented");
        assert_eq!(transport.requests().await[0].endpoint, "dns/list-zones.xml");
    }

    #[tokio::test(start_paused = true)]
    async fn server_errors_are_retried_then_reported() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..4 {
            transport
                .push_response(TransportResponse::new(500, "Internal Server Error"))
                .await;
        }
        let client = client_with(&transport);
        let start = tokio::time::Instant::now();

        let err = client.get("x", Params::new()).await.unwrap_err();

        assert_eq!(transport.calls().await, 4);
        assert!(start.elapsed() >= Duration::from_millis(6000));
        assert!(matches!(err, ClouDnsError::Generic { .. }));
        assert_eq!(
            err.message(),
            "API request failed with status 500: Internal Server Error"
        );
        assert_eq!(err.context().get("status"), Some(&json!(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(TransportResponse::new(503, "")).await;
        transport.push_response(TransportResponse::new(503, "")).await;
        transport.push_response(ok(r#"{"status":"Success"}"#)).await;
        let client = client_with(&transport);
        let start = tokio::time::Instant::now();

        let body = client.get("x", Params::new()).await.unwrap();

        assert_eq!(body, json!({"status": "Success"}));
        assert_eq!(transport.calls().await, 3);
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn client_error_status_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(TransportResponse::new(404, "nope")).await;
        let client = client_with(&transport);

        let err = client.get("x", Params::new()).await.unwrap_err();
        assert_eq!(transport.calls().await, 1);
        assert_eq!(err.message(), "API request failed with status 404: nope");
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_is_wrapped() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..4 {
            transport
                .push_error(TransportError::Connection("connection refused".into()))
                .await;
        }
        let client = client_with(&transport);

        let err = client.get("x", Params::new()).await.unwrap_err();
        assert_eq!(transport.calls().await, 4);
        assert!(matches!(err, ClouDnsError::Generic { .. }));
        assert_eq!(err.message(), "HTTP request failed: connection refused");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_rate_limit_surfaces_retry_after() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..4 {
            transport
                .push_response(TransportResponse {
                    status: 429,
                    body: "slow down".into(),
                    retry_after: Some(30),
                })
                .await;
        }
        let client = client_with(&transport);

        let err = client.get("x", Params::new()).await.unwrap_err();
        assert_eq!(err.retry_after(), Some(30));
        assert_eq!(err.message(), "API request failed with status 429: slow down");
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_does_not_block_other_requests() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(TransportResponse::new(500, "")).await;
        transport.push_response(ok(r#"{"req":"fast"}"#)).await;
        transport.push_response(ok(r#"{"req":"slow"}"#)).await;
        let client = client_with(&transport);
        let start = tokio::time::Instant::now();

        let slow = tokio::spawn({
            let client = client.clone();
            async move { client.get("dns/slow", Params::new()).await }
        });
        while transport.calls().await == 0 {
            tokio::task::yield_now().await;
        }

        let fast = client.get("dns/fast", Params::new()).await.unwrap();
        assert_eq!(fast, json!({"req": "fast"}));
        assert!(start.elapsed() < Duration::from_millis(1000));
        assert!(!slow.is_finished());

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, json!({"req": "slow"}));
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(transport.calls().await, 3);
    }
}
