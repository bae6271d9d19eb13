// ── Domain model ──

pub mod domain;
pub mod plan;
pub mod record;

pub use domain::{ALL_RECORD_TYPES, DEFAULT_RECORD_TYPES, DomainTarget};
pub use plan::{Action, ExecutionReport, Outcome, PlannedUpdate, ReconciliationPlan};
pub use record::{DeclaredRecord, DnsRecord, Owner, RecordKey, RecordType};
