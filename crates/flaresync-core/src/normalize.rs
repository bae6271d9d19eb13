// ── Record set normalizer ──
//
// Turns declared entries into records comparable with provider state:
// FQDN names, automatic TTL, no ids.

use crate::error::CoreError;
use crate::model::{DeclaredRecord, DnsRecord, RecordType};

/// Reject entries with an empty type or name. Indices in errors are 1-based.
pub fn validate(declared: &[DeclaredRecord]) -> Result<(), CoreError> {
    for (i, entry) in declared.iter().enumerate() {
        let message = if entry.record.record_type.is_empty() {
            "record type cannot be empty"
        } else if entry.record.name.trim().is_empty() {
            "record name cannot be empty"
        } else {
            continue;
        };
        return Err(CoreError::Validation {
            index: i + 1,
            message: message.to_owned(),
        });
    }
    Ok(())
}

/// Keep only entries whose type is enabled.
pub fn select_types(declared: &[DeclaredRecord], types: &[RecordType]) -> Vec<DeclaredRecord> {
    declared
        .iter()
        .filter(|d| types.contains(&d.record.record_type))
        .cloned()
        .collect()
}

/// Expand a relative name to an FQDN: `@` is the apex, anything else
/// becomes `<name>.<domain>`.
pub fn qualify(name: &str, domain: &str) -> String {
    if name == "@" {
        domain.to_owned()
    } else {
        format!("{name}.{domain}")
    }
}

/// Normalize declared entries for reconciliation.
///
/// Every record gets `ttl = 1` (automatic) and loses any `id` the file
/// carried. Duplicates are kept; the reconciler resolves them.
pub fn normalize(declared: &[DeclaredRecord], domain: &str) -> Vec<DnsRecord> {
    declared
        .iter()
        .map(|entry| DnsRecord {
            id: None,
            name: qualify(&entry.record.name, domain),
            ttl: 1,
            ..entry.record.clone()
        })
        .collect()
}
