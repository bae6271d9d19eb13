// In-memory `DnsProvider` for unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{DnsRecord, RecordType};
use crate::provider::{DnsProvider, RecordPage};

#[derive(Default)]
struct State {
    records: Vec<DnsRecord>,
    next_id: u32,
    calls: Vec<String>,
}

/// Zone held in memory. Listing reports `has_more = true` unless
/// `report_totals` is set, mimicking a provider without page totals.
/// `unsuccessful_page` answers that page with `success = false` while
/// still returning its records.
#[derive(Default)]
pub(crate) struct MemoryProvider {
    state: Mutex<State>,
    pub report_totals: bool,
    pub fail_names: HashSet<String>,
    pub blank_delete_ids: HashSet<String>,
    pub fail_listing: bool,
    pub unsuccessful_page: Option<u32>,
}

fn rejected(what: &str) -> CoreError {
    CoreError::Provider {
        message: format!("rejected {what}"),
        code: Some(1004),
        status: Some(400),
    }
}

impl MemoryProvider {
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.lock().unwrap();
            for mut r in records {
                state.next_id += 1;
                if r.id.is_none() {
                    r.id = Some(format!("rec-{}", state.next_id));
                }
                state.records.push(r);
            }
        }
        provider
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("list")).count()
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls().iter().filter(|c| !c.starts_with("list")).count()
    }
}

#[async_trait]
impl DnsProvider for MemoryProvider {
    async fn list_records(
        &self,
        _zone_id: &str,
        record_type: &RecordType,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list {record_type} {page}"));
        if self.fail_listing {
            return Err(CoreError::Timeout { timeout_secs: 30 });
        }

        let matching: Vec<_> = state
            .records
            .iter()
            .filter(|r| &r.record_type == record_type)
            .cloned()
            .collect();
        let start = usize::try_from((page - 1) * per_page).unwrap();
        let end = (start + usize::try_from(per_page).unwrap()).min(matching.len());
        let records = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

        Ok(RecordPage {
            records,
            success: self.unsuccessful_page != Some(page),
            has_more: !self.report_totals || end < matching.len(),
        })
    }

    async fn create_record(
        &self,
        _zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create {}", record.name));
        if self.fail_names.contains(&record.name) {
            return Err(rejected(&record.name));
        }
        state.next_id += 1;
        let created = DnsRecord {
            id: Some(format!("rec-{}", state.next_id)),
            proxiable: record.record_type.is_proxy_eligible(),
            ..record.clone()
        };
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update_record(
        &self,
        _zone_id: &str,
        id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {}", record.name));
        if self.fail_names.contains(&record.name) {
            return Err(rejected(&record.name));
        }
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| rejected(id))?;
        *slot = DnsRecord {
            id: Some(id.to_owned()),
            proxiable: slot.proxiable,
            ..record.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_record(&self, _zone_id: &str, id: &str) -> Result<String, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {id}"));
        let before = state.records.len();
        state.records.retain(|r| r.id.as_deref() != Some(id));
        if state.records.len() == before {
            return Err(rejected(id));
        }
        if self.blank_delete_ids.contains(id) {
            return Ok(String::new());
        }
        Ok(id.to_owned())
    }
}
