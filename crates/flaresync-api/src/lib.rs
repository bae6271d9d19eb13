// flaresync-api: Async Rust client for the Cloudflare v4 DNS records API

pub mod client;
pub mod error;
pub mod models;
pub mod records;
pub mod transport;

pub use client::{CloudflareClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{ApiMessage, DeletedRecord, DnsRecordResponse, Envelope, RecordListing, RecordPayload, ResultInfo};
pub use records::ListParams;
pub use transport::TransportConfig;
