// DNS record endpoints
//
// All calls are zone-scoped: `zones/{zone_id}/dns_records[/{id}]`.

use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{DeletedRecord, DnsRecordResponse, RecordListing, RecordPayload};

/// Query for one page of a type-filtered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub record_type: String,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

fn records_path(zone_id: &str) -> String {
    format!("zones/{zone_id}/dns_records")
}

impl CloudflareClient {
    /// List one page of DNS records of a single type.
    ///
    /// `GET zones/{zone_id}/dns_records?type=&page=&per_page=`
    pub async fn list_dns_records(
        &self,
        zone_id: &str,
        params: &ListParams,
    ) -> Result<RecordListing, Error> {
        debug!(zone_id, record_type = %params.record_type, page = params.page, "listing dns records");
        let envelope = self
            .get_with_params::<Vec<DnsRecordResponse>>(
                &records_path(zone_id),
                &[
                    ("type", params.record_type.clone()),
                    ("page", params.page.to_string()),
                    ("per_page", params.per_page.to_string()),
                ],
            )
            .await?;

        Ok(RecordListing {
            records: envelope.result.unwrap_or_default(),
            success: envelope.success,
            info: envelope.result_info,
        })
    }

    /// Create a DNS record.
    ///
    /// `POST zones/{zone_id}/dns_records`
    pub async fn create_dns_record(
        &self,
        zone_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecordResponse, Error> {
        debug!(zone_id, name = %payload.name, "creating dns record");
        self.post::<DnsRecordResponse, _>(&records_path(zone_id), payload)
            .await?
            .result
            .ok_or(Error::EmptyResult {
                operation: "create",
            })
    }

    /// Overwrite a DNS record by id.
    ///
    /// `PUT zones/{zone_id}/dns_records/{record_id}`
    pub async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecordResponse, Error> {
        debug!(zone_id, record_id, name = %payload.name, "updating dns record");
        self.put::<DnsRecordResponse, _>(
            &format!("{}/{record_id}", records_path(zone_id)),
            payload,
        )
        .await?
        .result
        .ok_or(Error::EmptyResult {
            operation: "update",
        })
    }

    /// Delete a DNS record by id, returning the id Cloudflare confirms.
    ///
    /// `DELETE zones/{zone_id}/dns_records/{record_id}`. The confirmation
    /// is empty when the API answered without a `result`; callers decide
    /// whether that counts as a failure.
    pub async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<String, Error> {
        debug!(zone_id, record_id, "deleting dns record");
        let envelope = self
            .delete::<DeletedRecord>(&format!("{}/{record_id}", records_path(zone_id)))
            .await?;
        Ok(envelope.result.unwrap_or_default().id)
    }
}
