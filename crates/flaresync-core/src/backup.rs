// ── Remote snapshot ──
//
// Converts live records back into a declared-records file, so a zone can
// be bootstrapped into version control or restored later.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CoreError;
use crate::model::{DeclaredRecord, DnsRecord};
use crate::records_file;
use crate::restrict::relative_name;

/// `dns_records_<domain>_<label>.json`
pub fn backup_file_name(domain: &str, label: &str) -> String {
    format!("dns_records_{domain}_{label}.json")
}

/// Declared entries for `records`, with names relative to `domain`.
pub fn snapshot(records: Vec<DnsRecord>, domain: &str) -> Vec<DeclaredRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.name = relative_name(&record.name, domain).to_owned();
            DeclaredRecord::from(record)
        })
        .collect()
}

/// Write `entries` into `dir` under the backup file name; returns the path.
pub fn write_backup(
    dir: &Path,
    domain: &str,
    label: &str,
    entries: &[DeclaredRecord],
) -> Result<PathBuf, CoreError> {
    let path = dir.join(backup_file_name(domain, label));
    records_file::write_entries(&path, entries)?;
    info!(domain, path = %path.display(), count = entries.len(), "backup written");
    Ok(path)
}
