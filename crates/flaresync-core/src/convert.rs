// ── API-to-domain type conversions ──
//
// Bridges `flaresync_api` wire types and `flaresync_core::model` records.

use flaresync_api::{DnsRecordResponse, RecordPayload};

use crate::model::DnsRecord;

impl From<DnsRecordResponse> for DnsRecord {
    fn from(r: DnsRecordResponse) -> Self {
        Self {
            id: Some(r.id).filter(|id| !id.is_empty()),
            record_type: r.record_type.into(),
            name: r.name,
            content: r.content,
            proxiable: r.proxiable,
            proxied: r.proxied,
            ttl: r.ttl,
        }
    }
}

impl From<&DnsRecord> for RecordPayload {
    fn from(r: &DnsRecord) -> Self {
        Self {
            record_type: r.record_type.to_string(),
            name: r.name.clone(),
            content: r.content.clone(),
            ttl: r.ttl,
            proxied: r.proxied,
        }
    }
}
