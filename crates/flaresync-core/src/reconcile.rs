// ── Record reconciler ──
//
// Three-way diff keyed by `(name, type)`. Both sides go through
// insertion-ordered maps so the plan is fully deterministic:
// creates/updates follow local order, deletes follow remote order.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::model::{DnsRecord, PlannedUpdate, RecordKey, ReconciliationPlan};

/// Compute the plan that takes `remote` to `local`.
///
/// - Local duplicates: the last declaration wins, at the first one's position.
/// - Remote duplicates: the first record is authoritative; the rest of a
///   matched key are left alone.
/// - A remote record is deleted when no local record shares its key.
pub fn plan(local: &[DnsRecord], remote: &[DnsRecord]) -> ReconciliationPlan {
    let mut remote_index: IndexMap<RecordKey, &DnsRecord> = IndexMap::with_capacity(remote.len());
    for record in remote {
        if let Entry::Vacant(slot) = remote_index.entry(record.key()) {
            slot.insert(record);
        }
    }

    let mut desired: IndexMap<RecordKey, &DnsRecord> = IndexMap::with_capacity(local.len());
    for record in local {
        if desired.insert(record.key(), record).is_some() {
            debug!(name = %record.name, record_type = %record.record_type, "duplicate local record, last one wins");
        }
    }

    let mut plan = ReconciliationPlan::default();

    for (key, wanted) in &desired {
        match remote_index.get(key) {
            None => plan.to_create.push(DnsRecord {
                id: None,
                ..(*wanted).clone()
            }),
            Some(existing) if existing.differs_from(wanted) => {
                let id = existing.id.clone().unwrap_or_default();
                plan.to_update.push(PlannedUpdate {
                    record: DnsRecord {
                        id: Some(id.clone()),
                        ..(*wanted).clone()
                    },
                    previous: (*existing).clone(),
                    id,
                });
            }
            Some(_) => {}
        }
    }

    plan.to_delete = remote
        .iter()
        .filter(|r| !desired.contains_key(&r.key()))
        .cloned()
        .collect();

    debug!(
        create = plan.to_create.len(),
        update = plan.to_update.len(),
        delete = plan.to_delete.len(),
        "plan computed"
    );
    plan
}
