// ── Plan executor ──
//
// Applies a plan phase by phase (create, update, delete). Items are
// independent: a failed call is recorded on its outcome and the rest of
// the plan still runs. There is no rollback.

use tracing::{info, warn};

use crate::model::{Action, DnsRecord, ExecutionReport, ReconciliationPlan};
use crate::provider::DnsProvider;

pub struct Executor<'a, P: DnsProvider + ?Sized> {
    provider: &'a P,
    zone_id: &'a str,
    dry_run: bool,
}

impl<'a, P: DnsProvider + ?Sized> Executor<'a, P> {
    pub fn new(provider: &'a P, zone_id: &'a str) -> Self {
        Self {
            provider,
            zone_id,
            dry_run: false,
        }
    }

    /// Report intended mutations without calling the provider.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn apply(&self, plan: &ReconciliationPlan) -> ExecutionReport {
        let mut report = ExecutionReport {
            dry_run: self.dry_run,
            ..ExecutionReport::default()
        };

        for record in &plan.to_create {
            let error = if self.dry_run {
                None
            } else {
                self.provider
                    .create_record(self.zone_id, record)
                    .await
                    .err()
                    .map(|e| e.to_string())
            };
            self.log(Action::Create, record, error.as_deref());
            report.record(Action::Create, record.clone(), error);
        }

        for update in &plan.to_update {
            let error = if self.dry_run {
                None
            } else if update.id.is_empty() {
                Some("remote record has no id".to_owned())
            } else {
                self.provider
                    .update_record(self.zone_id, &update.id, &update.record)
                    .await
                    .err()
                    .map(|e| e.to_string())
            };
            self.log(Action::Update, &update.record, error.as_deref());
            report.record(Action::Update, update.record.clone(), error);
        }

        for record in &plan.to_delete {
            let error = if self.dry_run {
                None
            } else {
                self.delete(record).await
            };
            self.log(Action::Delete, record, error.as_deref());
            report.record(Action::Delete, record.clone(), error);
        }

        info!(
            zone_id = self.zone_id,
            dry_run = self.dry_run,
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            failed = report.failures().count(),
            "plan applied"
        );
        report
    }

    async fn delete(&self, record: &DnsRecord) -> Option<String> {
        let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) else {
            return Some("remote record has no id".to_owned());
        };
        match self.provider.delete_record(self.zone_id, id).await {
            Ok(confirmed) if confirmed.is_empty() => {
                Some(format!("provider did not confirm deletion of {id}"))
            }
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    }

    fn log(&self, action: Action, record: &DnsRecord, error: Option<&str>) {
        match error {
            Some(error) => warn!(
                %action,
                name = %record.name,
                record_type = %record.record_type,
                error,
                "mutation failed"
            ),
            None => info!(
                %action,
                name = %record.name,
                record_type = %record.record_type,
                dry_run = self.dry_run,
                "record applied"
            ),
        }
    }
}
