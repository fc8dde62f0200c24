//! Shared helpers for integration tests

#![allow(dead_code)]

use std::time::Duration;

use cloudns_client::{ClouDnsClient, ClouDnsClientBuilder, Credentials};
use serde_json::Value;
use wiremock::ResponseTemplate;

pub const AUTH_ID: &str = "1234";
pub const AUTH_PASSWORD: &str = "test-password";

/// Skips the test when any of the environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Asserts that a `Result` is `Ok` and unwraps it.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Builder pointed at a mock server, with fast retries and logging off.
pub fn mock_builder(base_url: &str) -> ClouDnsClientBuilder {
    ClouDnsClient::builder(Credentials::new(AUTH_ID, AUTH_PASSWORD))
        .base_url(base_url)
        .retry_delay(Duration::from_millis(10))
        .log_enabled(false)
}

pub fn mock_client(base_url: &str) -> ClouDnsClient {
    mock_builder(base_url)
        .build()
        .expect("client should build")
}

/// HTTP 200 with a JSON body.
pub fn json_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Client for the real API, from `CLOUDNS_*` variables.
pub fn live_client() -> Option<ClouDnsClient> {
    ClouDnsClient::from_env().ok()
}
