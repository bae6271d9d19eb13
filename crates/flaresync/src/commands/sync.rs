//! `flaresync sync`: apply declared records to each zone.

use std::fmt::Write;

use tracing::info;

use flaresync_core::{Action, SyncReport, pipeline};

use crate::cli::SyncArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, Tone, paint};

use super::diff::record_line;
use super::run_domains;

pub async fn handle(ctx: &Context<'_>, args: &SyncArgs) -> Result<(), CliError> {
    let targets = ctx.targets()?;
    let dry_run = args.dry_run;
    let mut results = run_domains(targets, args.parallel, |target| async move {
        let client = ctx.client(&target)?;
        let report = pipeline::sync(&client, &target, dry_run).await?;
        info!(
            domain = %target.name,
            created = report.execution.created,
            updated = report.execution.updated,
            deleted = report.execution.deleted,
            dry_run,
            "sync finished"
        );
        Ok(report)
    })
    .await;

    let color = ctx.color();
    let out = output::render_single(ctx.output(), &results.done, |reports| {
        reports
            .iter()
            .map(|r| render_report(r, color))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, ctx.global.quiet);

    results.mark_degraded(|r| r.execution.has_failures());
    results.finish()
}

fn marker(action: Action) -> (char, Tone) {
    match action {
        Action::Create => ('+', Tone::Added),
        Action::Update => ('~', Tone::Changed),
        Action::Delete => ('-', Tone::Removed),
    }
}

fn render_report(report: &SyncReport, color: bool) -> String {
    let exec = &report.execution;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} created, {} updated, {} deleted{}",
        report.diff.domain,
        exec.created,
        exec.updated,
        exec.deleted,
        if exec.dry_run { " (dry run)" } else { "" }
    );

    for outcome in &exec.outcomes {
        let (mark, tone) = marker(outcome.action);
        let line = record_line(mark, &outcome.record);
        match &outcome.error {
            None => {
                let _ = writeln!(out, "  {}", paint(&line, tone, color));
            }
            Some(err) => {
                let failed = format!("{line}  FAILED: {err}");
                let _ = writeln!(out, "  {}", paint(&failed, Tone::Removed, color));
            }
        }
    }
    if exec.outcomes.is_empty() {
        let _ = writeln!(out, "  Already in sync.");
    }
    out.trim_end().to_owned()
}
