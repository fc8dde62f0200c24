use std::collections::BTreeMap;

use futures::future::join_all;
use serde_json::Value;

use crate::client::ClouDnsClient;
use crate::error::{ClouDnsError, Result};
use crate::params::Params;
use crate::types::{CreateRecordRequest, Record, RecordPage, RecordType, RecordUpdate, RowsPerPage};

use super::{decode, extract_bracketed_id, field_u32, numeric_entries};

/// DNS record management within a zone.
pub struct RecordService<'a> {
    client: &'a ClouDnsClient,
}

impl<'a> RecordService<'a> {
    pub(crate) fn new(client: &'a ClouDnsClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        domain_name: &str,
        host: Option<&str>,
        record_type: Option<RecordType>,
        page: u32,
        rows_per_page: RowsPerPage,
    ) -> Result<RecordPage> {
        let params = Params::new()
            .with("domain-name", domain_name)
            .with("page", page)
            .with("rows-per-page", rows_per_page)
            .with_opt("host", host)
            .with_opt("type", record_type);

        let response = self.client.get("dns/records", params).await?;
        Ok(RecordPage {
            page: field_u32(&response, "page", page),
            pages: field_u32(&response, "pages", 1),
            records: numeric_entries(&response)?,
        })
    }

    pub async fn get(&self, domain_name: &str, record_id: u64) -> Result<Record> {
        let params = Params::new()
            .with("domain-name", domain_name)
            .with("record-id", record_id);
        let response = self.client.get("dns/get-record", params).await?;
        decode(response)
    }

    /// Validates and adds a record; returns the new record id.
    pub async fn create(&self, request: &CreateRecordRequest) -> Result<u64> {
        request.validate()?;
        let response = self.client.post("dns/add-record", request.to_params()).await?;

        response
            .get("statusDescription")
            .and_then(Value::as_str)
            .and_then(extract_bracketed_id)
            .ok_or_else(|| {
                ClouDnsError::generic("Failed to extract record ID from response")
                    .with_context("response", response.clone())
            })
    }

    pub async fn update(&self, domain_name: &str, record_id: u64, update: &RecordUpdate) -> Result<Value> {
        let mut params = update.to_params();
        params.insert("domain-name", domain_name);
        params.insert("record-id", record_id);
        self.client.post("dns/mod-record", params).await
    }

    pub async fn delete(&self, domain_name: &str, record_id: u64) -> Result<Value> {
        let params = Params::new()
            .with("domain-name", domain_name)
            .with("record-id", record_id);
        self.client.post("dns/delete-record", params).await
    }

    /// Copies all records of `from_domain` into `to_domain`.
    pub async fn copy(&self, from_domain: &str, to_domain: &str, delete_current_records: bool) -> Result<Value> {
        let params = Params::new()
            .with("from-domain", from_domain)
            .with("to-domain", to_domain)
            .with("delete-current-records", delete_current_records);
        self.client.post("dns/copy-records", params).await
    }

    /// Imports records from zone file content (`format` is e.g. `bind`).
    pub async fn import(
        &self,
        domain_name: &str,
        content: &str,
        format: &str,
        delete_existing_records: bool,
        record_types: &[RecordType],
    ) -> Result<Value> {
        let mut params = Params::new()
            .with("domain-name", domain_name)
            .with("format", format)
            .with("content", content)
            .with("delete-existing-records", delete_existing_records);
        if !record_types.is_empty() {
            params.insert("record-types", record_types.to_vec());
        }
        self.client.post("dns/records-import", params).await
    }

    /// Zone in BIND format; empty when the response carries no `zone`.
    pub async fn export(&self, domain_name: &str) -> Result<String> {
        let response = self
            .client
            .get("dns/records-export", Params::new().with("domain-name", domain_name))
            .await?;
        Ok(response
            .get("zone")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Every matching record, fetched 100 per page.
    pub async fn get_all(
        &self,
        domain_name: &str,
        host: Option<&str>,
        record_type: Option<RecordType>,
    ) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let result = self
                .list(domain_name, host, record_type, page, RowsPerPage::Hundred)
                .await?;
            records.extend(result.records);
            if page >= result.pages {
                break;
            }
            page += 1;
        }
        Ok(records)
    }

    /// Deletes several records concurrently. A failure for one id does not
    /// stop the others; every id gets its own outcome.
    pub async fn delete_multiple(&self, domain_name: &str, record_ids: &[u64]) -> BTreeMap<u64, Result<Value>> {
        let log_enabled = self.client.config().log_enabled;
        let outcomes = join_all(record_ids.iter().map(|&id| async move {
            let outcome = self.delete(domain_name, id).await;
            if log_enabled && let Err(e) = &outcome {
                log::warn!("[cloudns] Failed to delete record {id}: {e}");
            }
            (id, outcome)
        }))
        .await;
        outcomes.into_iter().collect()
    }
}
