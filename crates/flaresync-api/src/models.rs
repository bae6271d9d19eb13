// Cloudflare API response and request types
//
// Every v4 response is wrapped in the `Envelope<T>`. Fields use
// `#[serde(default)]` liberally because list, mutation and delete endpoints
// do not all populate the same envelope keys.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Cloudflare v4 response envelope.
///
/// ```json
/// { "success": true, "errors": [], "messages": [], "result": ..., "result_info": {...} }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

/// Pagination metadata on list responses.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

// ── DNS records ──────────────────────────────────────────────────────

/// A DNS record as returned by `zones/{zone}/dns_records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecordResponse {
    pub id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub proxiable: bool,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub modified_on: Option<String>,
}

/// Body for create (`POST`) and overwrite (`PUT`) calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// `result` of a delete call: just the id of the removed record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletedRecord {
    #[serde(default)]
    pub id: String,
}

/// One page of a type-filtered record listing.
#[derive(Debug, Clone)]
pub struct RecordListing {
    pub records: Vec<DnsRecordResponse>,
    /// The envelope's `success` flag.
    pub success: bool,
    pub info: Option<ResultInfo>,
}

impl RecordListing {
    /// Whether the API reports pages beyond this one.
    ///
    /// Without `result_info` totals the answer is unknown and treated as
    /// `true`; callers still stop on a short page.
    pub fn has_more(&self) -> bool {
        match self.info {
            Some(info) if info.total_pages > 0 => info.page < info.total_pages,
            _ => true,
        }
    }
}
