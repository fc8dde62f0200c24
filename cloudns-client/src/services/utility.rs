use serde_json::Value;

use crate::client::ClouDnsClient;
use crate::error::Result;
use crate::params::Params;
use crate::types::ZoneType;

/// Lookup endpoints describing what the account may use.
pub struct UtilityService<'a> {
    client: &'a ClouDnsClient,
}

impl<'a> UtilityService<'a> {
    pub(crate) fn new(client: &'a ClouDnsClient) -> Self {
        Self { client }
    }

    pub async fn available_ttls(&self) -> Result<Value> {
        self.client.get("dns/get-available-ttl", Params::new()).await
    }

    pub async fn available_record_types(&self, zone_type: ZoneType) -> Result<Value> {
        self.client
            .get(
                "dns/get-available-record-types",
                Params::new().with("zone-type", zone_type),
            )
            .await
    }
}
