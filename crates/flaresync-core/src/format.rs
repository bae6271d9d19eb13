// ── Records file formatter and checker ──
//
// `fmt` rewrites a records file into canonical shape: proxy-eligible
// records (A, AAAA, CNAME) are proxied with automatic TTL, and restricted
// entries can be stripped. `fmt --check` validates without writing.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{DeclaredRecord, DnsRecord};
use crate::restrict::RestrictionList;

/// Result of formatting one records file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatOutcome {
    /// Entries after formatting, in file order.
    #[serde(skip)]
    pub entries: Vec<DeclaredRecord>,
    /// Entries whose proxy flag or TTL was changed.
    pub changed: usize,
    /// Restricted entries still present (when not stripped).
    pub restricted: Vec<DnsRecord>,
    /// Restricted entries removed.
    pub removed: usize,
    /// Whether the file on disk was rewritten.
    pub written: bool,
}

impl FormatOutcome {
    pub fn is_clean(&self) -> bool {
        self.changed == 0 && self.removed == 0
    }
}

/// Apply formatting rules in place of a copy of `entries`.
pub fn format_entries(
    entries: &[DeclaredRecord],
    restrictions: &RestrictionList,
    domain: &str,
    strip_restricted: bool,
) -> FormatOutcome {
    let mut outcome = FormatOutcome::default();

    for entry in entries {
        let mut entry = entry.clone();
        let record = &mut entry.record;
        record.proxiable = true;

        if record.record_type.is_proxy_eligible() {
            let mut touched = false;
            if !record.proxied {
                debug!(name = %record.name, "enabling proxy");
                record.proxied = true;
                touched = true;
            }
            if record.ttl == 0 {
                debug!(name = %record.name, "setting ttl to auto");
                record.ttl = 1;
                touched = true;
            }
            if touched {
                outcome.changed += 1;
            }
        }

        if restrictions.is_restricted(&entry.record.name, domain) {
            if strip_restricted {
                info!(name = %entry.record.name, "removing restricted entry");
                outcome.removed += 1;
                continue;
            }
            outcome.restricted.push(entry.record.clone());
        }
        outcome.entries.push(entry);
    }

    outcome
}

/// Non-fatal finding of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckWarning {
    /// 1-based position in the file.
    pub index: usize,
    pub name: String,
    pub message: String,
}

/// Findings of `fmt --check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub domain: String,
    pub entries: usize,
    pub warnings: Vec<CheckWarning>,
    pub restricted: Vec<DnsRecord>,
}

impl CheckReport {
    /// Restricted entries fail the check; warnings do not.
    pub fn passed(&self) -> bool {
        self.restricted.is_empty()
    }
}

/// Validate entries: empty type, name or content are errors; unproxied
/// proxy-eligible records are warnings; restricted names are reported.
pub fn check_entries(
    entries: &[DeclaredRecord],
    restrictions: &RestrictionList,
    domain: &str,
) -> Result<CheckReport, CoreError> {
    let mut report = CheckReport {
        domain: domain.to_owned(),
        entries: entries.len(),
        ..CheckReport::default()
    };

    for (i, entry) in entries.iter().enumerate() {
        let record = &entry.record;
        let index = i + 1;
        let invalid = |message: &str| CoreError::Validation {
            index,
            message: message.to_owned(),
        };

        if record.record_type.is_empty() {
            return Err(invalid("record type cannot be empty"));
        }
        if record.name.trim().is_empty() {
            return Err(invalid("record name cannot be empty"));
        }
        if record.content.trim().is_empty() {
            return Err(invalid("record content cannot be empty"));
        }

        if record.record_type.is_proxy_eligible() && !record.proxied {
            report.warnings.push(CheckWarning {
                index,
                name: record.name.clone(),
                message: format!("{} record is not proxied", record.record_type),
            });
        }
        if restrictions.is_restricted(&record.name, domain) {
            report.restricted.push(record.clone());
        }
    }

    Ok(report)
}
