// ── Per-domain reconciliation target ──

use std::path::PathBuf;

use secrecy::SecretString;

use super::record::RecordType;

/// Types reconciled when a domain enables none explicitly.
pub const DEFAULT_RECORD_TYPES: &[RecordType] = &[RecordType::A, RecordType::Cname];

/// Every type the `--type all` shorthand expands to.
pub const ALL_RECORD_TYPES: &[RecordType] = &[
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Cname,
    RecordType::Txt,
    RecordType::Mx,
    RecordType::Srv,
];

/// Everything the engine needs to reconcile one domain.
///
/// Built by `flaresync-config`; the engine itself never reads config files.
#[derive(Debug, Clone)]
pub struct DomainTarget {
    /// Apex domain, e.g. `example.com`.
    pub name: String,
    pub zone_id: String,
    pub token: SecretString,
    /// Declared-records JSON file.
    pub record_file: PathBuf,
    /// Restrictions JSON file; `None` restricts nothing.
    pub restricted_file: Option<PathBuf>,
    pub record_types: Vec<RecordType>,
    /// Match restriction patterns against the whole subdomain label.
    pub anchored_restrictions: bool,
}

impl DomainTarget {
    pub fn new(
        name: impl Into<String>,
        zone_id: impl Into<String>,
        token: SecretString,
        record_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            zone_id: zone_id.into(),
            token,
            record_file: record_file.into(),
            restricted_file: None,
            record_types: Vec::new(),
            anchored_restrictions: false,
        }
    }

    /// Record types to reconcile, falling back to [`DEFAULT_RECORD_TYPES`].
    pub fn enabled_types(&self) -> &[RecordType] {
        if self.record_types.is_empty() {
            DEFAULT_RECORD_TYPES
        } else {
            &self.record_types
        }
    }
}
