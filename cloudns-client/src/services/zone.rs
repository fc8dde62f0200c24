use serde_json::Value;

use crate::client::ClouDnsClient;
use crate::error::Result;
use crate::params::Params;
use crate::types::{CreateZoneRequest, RowsPerPage, Zone, ZonePage};

use super::{field_u32, numeric_entries};

/// Zone management (`dns/list-zones`, `dns/register`, ...).
pub struct ZoneService<'a> {
    client: &'a ClouDnsClient,
}

impl<'a> ZoneService<'a> {
    pub(crate) fn new(client: &'a ClouDnsClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        page: u32,
        rows_per_page: RowsPerPage,
        search: Option<&str>,
        group_id: Option<u64>,
    ) -> Result<ZonePage> {
        let params = Params::new()
            .with("page", page)
            .with("rows-per-page", rows_per_page)
            .with_opt("search", search)
            .with_opt("group-id", group_id);

        let response = self.client.get("dns/list-zones", params).await?;
        Ok(ZonePage {
            page: field_u32(&response, "page", page),
            pages: field_u32(&response, "pages", 1),
            zones: numeric_entries(&response)?,
        })
    }

    /// Validates and registers a new zone.
    pub async fn create(&self, request: &CreateZoneRequest) -> Result<Value> {
        request.validate()?;
        self.client.post("dns/register", request.to_params()).await
    }

    pub async fn delete(&self, domain_name: &str) -> Result<Value> {
        self.client
            .post("dns/delete", Params::new().with("domain-name", domain_name))
            .await
    }

    pub async fn get_info(&self, domain_name: &str) -> Result<Value> {
        self.client
            .get("dns/get-zone-info", Params::new().with("domain-name", domain_name))
            .await
    }

    pub async fn statistics(&self) -> Result<Value> {
        self.client.get("dns/get-zones-stats", Params::new()).await
    }

    /// Activates or deactivates a zone.
    pub async fn update_status(&self, domain_name: &str, active: bool) -> Result<Value> {
        let params = Params::new()
            .with("domain-name", domain_name)
            .with("status", active);
        self.client.post("dns/change-status", params).await
    }

    pub async fn page_count(&self, search: Option<&str>, group_id: Option<u64>) -> Result<u32> {
        let params = Params::new()
            .with_opt("search", search)
            .with_opt("group-id", group_id);
        let response = self.client.get("dns/get-pages-count", params).await?;
        Ok(field_u32(&response, "pages", 1))
    }

    /// `true` when `dns/get-zone-info` succeeds for the domain. Any error,
    /// including transport failures, counts as absent.
    pub async fn exists(&self, domain_name: &str) -> bool {
        match self.get_info(domain_name).await {
            Ok(_) => true,
            Err(e) => {
                if self.client.config().log_enabled {
                    log::debug!("[cloudns] Zone '{domain_name}' treated as absent: {e}");
                }
                false
            }
        }
    }

    /// Every zone, fetched 100 per page.
    pub async fn get_all(&self, search: Option<&str>, group_id: Option<u64>) -> Result<Vec<Zone>> {
        let mut zones = Vec::new();
        let mut page = 1;
        loop {
            let result = self.list(page, RowsPerPage::Hundred, search, group_id).await?;
            zones.extend(result.zones);
            if page >= result.pages {
                break;
            }
            page += 1;
        }
        Ok(zones)
    }
}
