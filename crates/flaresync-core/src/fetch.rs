// ── Remote record fetcher ──
//
// Pages through the provider listing one record type at a time. Each type
// keeps its own cursor; nothing carries over between types.

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{DnsRecord, RecordType};
use crate::provider::DnsProvider;

/// Cloudflare's maximum page size for DNS listings.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pagination state for a single record type.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    record_type: RecordType,
    page: u32,
    exhausted: bool,
}

impl Cursor {
    fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            page: 1,
            exhausted: false,
        }
    }
}

/// Collects the complete remote record set of a zone.
pub struct RecordFetcher<'a, P: DnsProvider + ?Sized> {
    provider: &'a P,
    page_size: u32,
}

impl<'a, P: DnsProvider + ?Sized> RecordFetcher<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetch every record of `types`, concatenated in type order.
    ///
    /// A type is done when a page comes back short or without further
    /// pages. An unsuccessful page ends the type and its records are
    /// dropped. Any provider error aborts the whole fetch.
    pub async fn fetch_all(
        &self,
        zone_id: &str,
        types: &[RecordType],
    ) -> Result<Vec<DnsRecord>, CoreError> {
        let mut all = Vec::new();

        for record_type in types {
            let mut cursor = Cursor::new(record_type.clone());
            while !cursor.exhausted {
                let page = self
                    .provider
                    .list_records(zone_id, &cursor.record_type, cursor.page, self.page_size)
                    .await?;

                let count = page.records.len();
                debug!(
                    zone_id,
                    record_type = %cursor.record_type,
                    page = cursor.page,
                    count,
                    success = page.success,
                    has_more = page.has_more,
                    "fetched page"
                );

                if !page.success {
                    warn!(
                        zone_id,
                        record_type = %cursor.record_type,
                        page = cursor.page,
                        "listing unsuccessful, discarding page"
                    );
                    cursor.exhausted = true;
                    continue;
                }

                let full = u32::try_from(count).is_ok_and(|n| n >= self.page_size);
                all.extend(page.records);

                if full && page.has_more {
                    cursor.page += 1;
                } else {
                    cursor.exhausted = true;
                }
            }
        }

        info!(zone_id, total = all.len(), "remote records fetched");
        Ok(all)
    }
}
