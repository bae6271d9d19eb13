// ── DNS provider seam ──
//
// The four calls the engine needs from an authoritative DNS provider.
// Credentials are bound when the provider is constructed, one instance
// per domain token.

use async_trait::async_trait;

use flaresync_api::{CloudflareClient, ListParams};

use crate::error::CoreError;
use crate::model::{DnsRecord, RecordType};

/// One page of a type-filtered listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<DnsRecord>,
    /// The provider's own success flag for the page.
    pub success: bool,
    /// Whether the provider reports pages beyond this one.
    pub has_more: bool,
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List page `page` (1-based) of records of one type.
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: &RecordType,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, CoreError>;

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError>;

    async fn update_record(
        &self,
        zone_id: &str,
        id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError>;

    /// Delete by id, returning the id the provider confirmed (possibly empty).
    async fn delete_record(&self, zone_id: &str, id: &str) -> Result<String, CoreError>;
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: &RecordType,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, CoreError> {
        let params = ListParams {
            record_type: record_type.to_string(),
            page,
            per_page,
        };
        let listing = self.list_dns_records(zone_id, &params).await?;
        let has_more = listing.has_more();
        Ok(RecordPage {
            records: listing.records.into_iter().map(DnsRecord::from).collect(),
            success: listing.success,
            has_more,
        })
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError> {
        let created = self.create_dns_record(zone_id, &record.into()).await?;
        Ok(created.into())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError> {
        let updated = self.update_dns_record(zone_id, id, &record.into()).await?;
        Ok(updated.into())
    }

    async fn delete_record(&self, zone_id: &str, id: &str) -> Result<String, CoreError> {
        Ok(self.delete_dns_record(zone_id, id).await?)
    }
}
