// ── Reconciliation plan and execution report ──

use std::fmt;

use serde::Serialize;

use super::record::DnsRecord;

/// Overwrite of an existing remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedUpdate {
    /// Remote id the overwrite targets.
    pub id: String,
    /// Desired state.
    pub record: DnsRecord,
    /// Remote state being replaced.
    pub previous: DnsRecord,
}

/// The create/update/delete sets that take remote state to local state.
///
/// A `(name, type)` key appears in at most one of the three lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    pub to_create: Vec<DnsRecord>,
    pub to_update: Vec<PlannedUpdate>,
    pub to_delete: Vec<DnsRecord>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Result of one planned mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub action: Action,
    pub record: DnsRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// What the executor did (or, under dry-run, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub dry_run: bool,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// One entry per planned item, in plan order.
    pub outcomes: Vec<Outcome>,
}

impl ExecutionReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.error.is_some())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    pub(crate) fn record(&mut self, action: Action, record: DnsRecord, error: Option<String>) {
        if error.is_none() {
            match action {
                Action::Create => self.created += 1,
                Action::Update => self.updated += 1,
                Action::Delete => self.deleted += 1,
            }
        }
        self.outcomes.push(Outcome {
            action,
            record,
            error,
        });
    }
}
