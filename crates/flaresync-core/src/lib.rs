// flaresync-core: DNS record reconciliation engine between flaresync-api and the CLI.

pub mod backup;
pub mod convert;
pub mod error;
pub mod execute;
pub mod fetch;
pub mod format;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod reconcile;
pub mod records_file;
pub mod restrict;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, ErrorKind};
pub use execute::Executor;
pub use fetch::{DEFAULT_PAGE_SIZE, RecordFetcher};
pub use format::{CheckReport, CheckWarning, FormatOutcome};
pub use pipeline::{DiffReport, SyncReport};
pub use provider::{DnsProvider, RecordPage};
pub use restrict::{Partition, RestrictionList};

pub use model::{
    ALL_RECORD_TYPES, Action, DEFAULT_RECORD_TYPES, DeclaredRecord, DnsRecord, DomainTarget,
    ExecutionReport, Outcome, Owner, PlannedUpdate, RecordKey, RecordType, ReconciliationPlan,
};
