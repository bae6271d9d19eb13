//! `flaresync backup`: snapshot live records into records files.

use std::path::PathBuf;

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use flaresync_core::{backup, pipeline};

use crate::cli::BackupArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::{run_domains, util};

#[derive(Debug, Serialize)]
struct Snapshot {
    domain: String,
    path: PathBuf,
    records: usize,
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Records")]
    records: usize,
    #[tabled(rename = "File")]
    path: String,
}

impl From<&Snapshot> for SnapshotRow {
    fn from(s: &Snapshot) -> Self {
        Self {
            domain: s.domain.clone(),
            records: s.records,
            path: s.path.display().to_string(),
        }
    }
}

/// Compact UTC timestamp used when `--label` is not given.
pub(crate) fn default_label() -> String {
    chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string()
}

pub async fn handle(ctx: &Context<'_>, args: &BackupArgs) -> Result<(), CliError> {
    let requested = util::parse_types(&args.types)?;
    let label = args.label.clone().unwrap_or_else(default_label);
    if label.trim().is_empty() || label.contains(['/', '\\']) {
        return Err(CliError::Validation {
            field: "label".into(),
            reason: "must be non-empty and contain no path separators".into(),
        });
    }
    std::fs::create_dir_all(&args.out_dir)?;
    debug!(label = %label, dir = %args.out_dir.display(), "backup destination");

    let targets = ctx.targets()?;
    let requested = requested.as_deref();
    let label = label.as_str();
    let results = run_domains(targets, false, |target| async move {
        let types = requested.unwrap_or(target.enabled_types());
        let client = ctx.client(&target)?;
        let entries = pipeline::backup(&client, &target, types).await?;
        let path = backup::write_backup(&args.out_dir, &target.name, label, &entries)
            .map_err(|e| e.in_domain(&target.name))?;
        Ok(Snapshot {
            domain: target.name.clone(),
            path,
            records: entries.len(),
        })
    })
    .await;

    let out = output::render_list(
        ctx.output(),
        &results.done,
        |s| SnapshotRow::from(s),
        |s| s.path.display().to_string(),
    )?;
    output::print_output(&out, ctx.global.quiet);

    results.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label_is_a_compact_utc_stamp() {
        let label = default_label();
        assert_eq!(label.len(), 16);
        assert!(label.ends_with('Z'));
        assert_eq!(label.as_bytes()[8], b'T');
    }
}
