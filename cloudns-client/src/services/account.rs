use serde_json::Value;

use crate::client::ClouDnsClient;
use crate::error::Result;
use crate::params::Params;

/// Account-level calls.
pub struct AccountService<'a> {
    client: &'a ClouDnsClient,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(client: &'a ClouDnsClient) -> Self {
        Self { client }
    }

    /// Checks the credentials against `login/login`.
    pub async fn test_login(&self) -> Result<Value> {
        self.client.post("login/login", Params::new()).await
    }

    /// `true` when the login call reports `"status": "Success"`.
    pub async fn is_authenticated(&self) -> bool {
        match self.test_login().await {
            Ok(response) => response.get("status").and_then(Value::as_str) == Some("Success"),
            Err(e) => {
                if self.client.config().log_enabled {
                    log::debug!("[cloudns] Login check failed: {e}");
                }
                false
            }
        }
    }

    /// Public IP the API sees for this client; empty when absent.
    pub async fn current_ip(&self) -> Result<String> {
        let response = self.client.get("account/get-current-ip", Params::new()).await?;
        Ok(response
            .get("ip")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    pub async fn balance(&self) -> Result<Value> {
        self.client.get("account/get-balance", Params::new()).await
    }

    pub async fn info(&self) -> Result<Value> {
        self.client.get("account/get-info", Params::new()).await
    }

    pub async fn statistics(&self) -> Result<Value> {
        self.client.get("account/get-statistics", Params::new()).await
    }
}
