// ── Per-domain verbs ──
//
// Each verb runs one domain strictly in sequence: load → validate →
// select types → normalize → filter restrictions → fetch → plan
// (→ execute). Errors carry the domain name.

use serde::Serialize;
use tracing::{info, warn};

use crate::backup;
use crate::error::CoreError;
use crate::execute::Executor;
use crate::fetch::RecordFetcher;
use crate::format::{self, CheckReport, FormatOutcome};
use crate::model::{
    DeclaredRecord, DnsRecord, DomainTarget, ExecutionReport, RecordType, ReconciliationPlan,
};
use crate::normalize;
use crate::provider::DnsProvider;
use crate::reconcile;
use crate::records_file;

/// What a sync would change for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub domain: String,
    pub remote_count: usize,
    /// Declared records after type selection and restriction filtering.
    pub local_count: usize,
    /// Declared records dropped by the restriction filter.
    pub restricted: Vec<DnsRecord>,
    pub plan: ReconciliationPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub diff: DiffReport,
    pub execution: ExecutionReport,
}

/// Declared records ready for reconciliation, split by restriction.
struct LocalSet {
    allowed: Vec<DnsRecord>,
    restricted: Vec<DnsRecord>,
}

fn load_local(target: &DomainTarget) -> Result<LocalSet, CoreError> {
    let entries = records_file::load_entries(&target.record_file)?;
    normalize::validate(&entries)?;
    let selected = normalize::select_types(&entries, target.enabled_types());
    let local = normalize::normalize(&selected, &target.name);

    let restrictions = records_file::load_restrictions(
        target.restricted_file.as_deref(),
        target.anchored_restrictions,
    )?;
    let partition = restrictions.partition(local, &target.name);
    if !partition.restricted.is_empty() {
        warn!(
            domain = %target.name,
            count = partition.restricted.len(),
            "restricted records skipped"
        );
    }
    Ok(LocalSet {
        allowed: partition.allowed,
        restricted: partition.restricted,
    })
}

async fn diff_inner<P: DnsProvider + ?Sized>(
    provider: &P,
    target: &DomainTarget,
) -> Result<DiffReport, CoreError> {
    let local = load_local(target)?;
    let remote = RecordFetcher::new(provider)
        .fetch_all(&target.zone_id, target.enabled_types())
        .await?;

    let plan = reconcile::plan(&local.allowed, &remote);
    info!(
        domain = %target.name,
        remote = remote.len(),
        local = local.allowed.len(),
        create = plan.to_create.len(),
        update = plan.to_update.len(),
        delete = plan.to_delete.len(),
        "diff computed"
    );

    Ok(DiffReport {
        domain: target.name.clone(),
        remote_count: remote.len(),
        local_count: local.allowed.len(),
        restricted: local.restricted,
        plan,
    })
}

/// Compute the plan for one domain without mutating anything.
pub async fn diff<P: DnsProvider + ?Sized>(
    provider: &P,
    target: &DomainTarget,
) -> Result<DiffReport, CoreError> {
    diff_inner(provider, target)
        .await
        .map_err(|e| e.in_domain(&target.name))
}

/// Compute and apply the plan for one domain.
///
/// Item-level provider failures land in the execution report; only
/// failures before execution (files, fetch) are returned as errors.
pub async fn sync<P: DnsProvider + ?Sized>(
    provider: &P,
    target: &DomainTarget,
    dry_run: bool,
) -> Result<SyncReport, CoreError> {
    let diff = diff(provider, target).await?;
    let execution = Executor::new(provider, &target.zone_id)
        .dry_run(dry_run)
        .apply(&diff.plan)
        .await;
    Ok(SyncReport { diff, execution })
}

/// Rewrite the domain's records file in canonical form.
///
/// The file is only touched when its content changes.
pub fn format(target: &DomainTarget, strip_restricted: bool) -> Result<FormatOutcome, CoreError> {
    format_inner(target, strip_restricted).map_err(|e| e.in_domain(&target.name))
}

fn format_inner(target: &DomainTarget, strip_restricted: bool) -> Result<FormatOutcome, CoreError> {
    let (entries, current) = records_file::load_entries_with_text(&target.record_file)?;
    let restrictions = records_file::load_restrictions(
        target.restricted_file.as_deref(),
        target.anchored_restrictions,
    )?;
    let mut outcome = format::format_entries(&entries, &restrictions, &target.name, strip_restricted);

    if records_file::render_entries(&outcome.entries) != current {
        records_file::write_entries(&target.record_file, &outcome.entries)?;
        outcome.written = true;
    }
    info!(
        domain = %target.name,
        changed = outcome.changed,
        removed = outcome.removed,
        written = outcome.written,
        "records formatted"
    );
    Ok(outcome)
}

/// Validate the domain's records file without writing.
pub fn check(target: &DomainTarget) -> Result<CheckReport, CoreError> {
    check_inner(target).map_err(|e| e.in_domain(&target.name))
}

fn check_inner(target: &DomainTarget) -> Result<CheckReport, CoreError> {
    let entries = records_file::load_entries(&target.record_file)?;
    let restrictions = records_file::load_restrictions(
        target.restricted_file.as_deref(),
        target.anchored_restrictions,
    )?;
    format::check_entries(&entries, &restrictions, &target.name)
}

/// Live records of `types`.
pub async fn list_remote<P: DnsProvider + ?Sized>(
    provider: &P,
    target: &DomainTarget,
    types: &[RecordType],
) -> Result<Vec<DnsRecord>, CoreError> {
    RecordFetcher::new(provider)
        .fetch_all(&target.zone_id, types)
        .await
        .map_err(|e| e.in_domain(&target.name))
}

/// Declared records of `types`, with FQDN names.
pub fn list_local(target: &DomainTarget, types: &[RecordType]) -> Result<Vec<DnsRecord>, CoreError> {
    let entries = records_file::load_entries(&target.record_file)
        .map_err(|e| e.in_domain(&target.name))?;
    let selected = normalize::select_types(&entries, types);
    Ok(selected
        .into_iter()
        .map(|entry| DnsRecord {
            name: normalize::qualify(&entry.record.name, &target.name),
            ..entry.record
        })
        .collect())
}

/// Snapshot live records of `types` as declared entries.
pub async fn backup<P: DnsProvider + ?Sized>(
    provider: &P,
    target: &DomainTarget,
    types: &[RecordType],
) -> Result<Vec<DeclaredRecord>, CoreError> {
    let records = list_remote(provider, target, types).await?;
    Ok(backup::snapshot(records, &target.name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::Action;
    use crate::testing::MemoryProvider;

    fn write(path: &Path, value: &serde_json::Value) {
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn target(dir: &Path, records: &serde_json::Value) -> DomainTarget {
        let record_file = dir.join("records.json");
        write(&record_file, records);
        DomainTarget::new(
            "example.com",
            "zone-1",
            SecretString::from("token".to_string()),
            record_file,
        )
    }

    fn with_restrictions(mut target: DomainTarget, dir: &Path, patterns: &[&str]) -> DomainTarget {
        let path = dir.join("restricted.json");
        write(&path, &serde_json::json!({ "restricted_subdomain": patterns }));
        target.restricted_file = Some(path);
        target
    }

    fn declared() -> serde_json::Value {
        serde_json::json!([
            { "record": { "type": "A", "name": "@", "content": "1.2.3.4", "proxied": true } },
            { "record": { "type": "CNAME", "name": "www", "content": "example.com", "proxied": true } },
            { "record": { "type": "TXT", "name": "@", "content": "ignored: type not enabled" } }
        ])
    }

    #[tokio::test]
    async fn empty_zone_creates_everything() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let provider = MemoryProvider::default();

        let report = diff(&provider, &target).await.unwrap();
        assert_eq!(report.remote_count, 0);
        assert_eq!(report.local_count, 2);
        let names: Vec<_> = report.plan.to_create.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["example.com", "www.example.com"]);
        assert!(report.plan.to_create.iter().all(|r| r.ttl == 1 && r.id.is_none()));
    }

    #[tokio::test]
    async fn sync_converges_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let provider = MemoryProvider::with_records(vec![
            DnsRecord::new("A", "example.com", "9.9.9.9").proxied(true),
            DnsRecord::new("A", "stale.example.com", "8.8.8.8"),
        ]);

        let first = sync(&provider, &target, false).await.unwrap();
        assert!(!first.execution.has_failures());
        assert_eq!(
            (first.execution.created, first.execution.updated, first.execution.deleted),
            (1, 1, 1)
        );

        let second = sync(&provider, &target, false).await.unwrap();
        assert!(second.diff.plan.is_empty());
        assert_eq!(second.execution.outcomes.len(), 0);

        let mut live: Vec<_> = provider
            .records()
            .into_iter()
            .map(|r| (r.name, r.content))
            .collect();
        live.sort();
        assert_eq!(
            live,
            vec![
                ("example.com".to_owned(), "1.2.3.4".to_owned()),
                ("www.example.com".to_owned(), "example.com".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn dry_run_leaves_zone_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let provider = MemoryProvider::with_records(vec![DnsRecord::new(
            "A",
            "stale.example.com",
            "8.8.8.8",
        )]);

        let report = sync(&provider, &target, true).await.unwrap();
        assert!(report.execution.dry_run);
        assert_eq!(report.execution.created, 2);
        assert_eq!(report.execution.deleted, 1);
        assert_eq!(provider.mutation_calls(), 0);
        assert_eq!(provider.records().len(), 1);
    }

    #[tokio::test]
    async fn restricted_records_are_never_created() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "A", "name": "api", "content": "1.1.1.1" } },
            { "record": { "type": "A", "name": "www", "content": "2.2.2.2" } }
        ]);
        let target = with_restrictions(target(dir.path(), &records), dir.path(), &["^api$"]);
        let provider = MemoryProvider::default();

        let report = sync(&provider, &target, false).await.unwrap();
        assert_eq!(report.diff.restricted.len(), 1);
        assert_eq!(report.diff.restricted[0].name, "api.example.com");
        assert_eq!(provider.calls().iter().filter(|c| c.starts_with("create")).count(), 1);
        assert_eq!(report.execution.outcomes[0].action, Action::Create);
        assert_eq!(report.execution.outcomes[0].record.name, "www.example.com");
    }

    #[tokio::test]
    async fn empty_name_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "A", "name": "", "content": "1.1.1.1" } }
        ]);
        let target = target(dir.path(), &records);
        let provider = MemoryProvider::default();

        let err = diff(&provider, &target).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().starts_with("example.com: "));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_a_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let mut provider = MemoryProvider::default();
        provider.fail_listing = true;

        let err = sync(&provider, &target, false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(provider.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn item_failures_are_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let mut provider = MemoryProvider::default();
        provider.fail_names.insert("www.example.com".into());

        let report = sync(&provider, &target, false).await.unwrap();
        assert_eq!(report.execution.created, 1);
        assert_eq!(report.execution.failures().count(), 1);
    }

    #[test]
    fn format_rewrites_only_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "CNAME", "name": "www", "content": "example.com" } }
        ]);
        let target = target(dir.path(), &records);

        let first = format(&target, false).unwrap();
        assert_eq!(first.changed, 1);
        assert!(first.written);

        let second = format(&target, false).unwrap();
        assert_eq!(second.changed, 0);
        assert!(!second.written);

        let entries = records_file::load_entries(&target.record_file).unwrap();
        assert!(entries[0].record.proxied);
        assert_eq!(entries[0].record.ttl, 1);
    }

    #[test]
    fn format_rewrites_canonical_entries_missing_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "CNAME", "name": "www", "content": "example.com", "proxied": true, "ttl": 1 } }
        ]);
        let target = target(dir.path(), &records);
        format(&target, false).unwrap();

        let canonical = std::fs::read_to_string(&target.record_file).unwrap();
        std::fs::write(&target.record_file, canonical.trim_end()).unwrap();

        let outcome = format(&target, false).unwrap();
        assert_eq!(outcome.changed, 0);
        assert!(outcome.written);
        assert_eq!(std::fs::read_to_string(&target.record_file).unwrap(), canonical);
    }

    #[test]
    fn format_of_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = target(dir.path(), &serde_json::json!([]));
        target.record_file = dir.path().join("absent.json");

        let err = format(&target, false).unwrap_err();
        assert!(matches!(err.root(), CoreError::ReadFile { .. }), "{err}");
    }

    #[test]
    fn format_strips_restricted_entries() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "A", "name": "mail", "content": "1.1.1.1" } },
            { "record": { "type": "A", "name": "www", "content": "2.2.2.2" } }
        ]);
        let target = with_restrictions(target(dir.path(), &records), dir.path(), &["^mail$"]);

        let kept = format(&target, false).unwrap();
        assert_eq!(kept.restricted.len(), 1);

        let stripped = format(&target, true).unwrap();
        assert_eq!(stripped.removed, 1);
        let entries = records_file::load_entries(&target.record_file).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.name, "www");
    }

    #[test]
    fn check_flags_restricted_names() {
        let dir = tempfile::tempdir().unwrap();
        let records = serde_json::json!([
            { "record": { "type": "A", "name": "api", "content": "1.1.1.1", "proxied": true } }
        ]);
        let target = with_restrictions(target(dir.path(), &records), dir.path(), &["api"]);

        let report = check(&target).unwrap();
        assert!(!report.passed());
        assert_eq!(report.domain, "example.com");
    }

    #[tokio::test]
    async fn list_and_backup_views() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path(), &declared());
        let provider = MemoryProvider::with_records(vec![
            DnsRecord::new("A", "example.com", "1.2.3.4"),
            DnsRecord::new("TXT", "example.com", "v=spf1 -all"),
        ]);

        let local = list_local(&target, &[RecordType::Txt]).unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].name, "example.com");

        let remote = list_remote(&provider, &target, &[RecordType::A, RecordType::Txt])
            .await
            .unwrap();
        assert_eq!(remote.len(), 2);

        let snapshot = backup(&provider, &target, &[RecordType::Txt]).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].record.name, "@");
    }
}
