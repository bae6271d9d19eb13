//! `flaresync diff`: preview the reconciliation plan per domain.

use std::fmt::Write;

use flaresync_core::{DiffReport, DnsRecord, pipeline};

use crate::cli::DiffArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, Tone, paint};

use super::run_domains;

pub async fn handle(ctx: &Context<'_>, args: &DiffArgs) -> Result<(), CliError> {
    let targets = ctx.targets()?;
    let results = run_domains(targets, args.parallel, |target| async move {
        let client = ctx.client(&target)?;
        Ok(pipeline::diff(&client, &target).await?)
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

    results.finish()
}

// ── Text rendering ──────────────────────────────────────────────────

pub(crate) fn record_line(marker: char, record: &DnsRecord) -> String {
    format!(
        "{marker} {:<6} {:<40} {}",
        record.record_type.as_str(),
        record.name,
        record.content
    )
}

fn proxy_label(record: &DnsRecord) -> &'static str {
    if record.proxied { "proxied" } else { "dns only" }
}

/// Human-readable plan for one domain.
pub(crate) fn render_report(report: &DiffReport, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} remote, {} declared, {} restricted",
        report.domain,
        report.remote_count,
        report.local_count,
        report.restricted.len()
    );

    let plan = &report.plan;
    for record in &plan.to_create {
        let _ = writeln!(out, "  {}", paint(&record_line('+', record), Tone::Added, color));
    }
    for update in &plan.to_update {
        let line = record_line('~', &update.record);
        let _ = writeln!(out, "  {}", paint(&line, Tone::Changed, color));
        let prev = &update.previous;
        if prev.content != update.record.content {
            let was = format!("      was: {}", prev.content);
            let _ = writeln!(out, "  {}", paint(&was, Tone::Muted, color));
        }
        if prev.proxied != update.record.proxied {
            let was = format!(
                "      proxy: {} -> {}",
                proxy_label(prev),
                proxy_label(&update.record)
            );
            let _ = writeln!(out, "  {}", paint(&was, Tone::Muted, color));
        }
    }
    for record in &plan.to_delete {
        let _ = writeln!(out, "  {}", paint(&record_line('-', record), Tone::Removed, color));
    }
    for record in &report.restricted {
        let line = format!("! {:<6} {:<40} restricted, skipped", record.record_type.as_str(), record.name);
        let _ = writeln!(out, "  {}", paint(&line, Tone::Muted, color));
    }

    if plan.is_empty() {
        let _ = writeln!(out, "  No differences.");
    } else {
        let _ = writeln!(
            out,
            "  {} to create, {} to update, {} to delete",
            plan.to_create.len(),
            plan.to_update.len(),
            plan.to_delete.len()
        );
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use flaresync_core::{PlannedUpdate, ReconciliationPlan};

    use super::*;

    fn report(plan: ReconciliationPlan) -> DiffReport {
        DiffReport {
            domain: "example.com".into(),
            remote_count: 2,
            local_count: 2,
            restricted: vec![DnsRecord::new("CNAME", "api.example.com", "x.example.net")],
            plan,
        }
    }

    #[test]
    fn empty_plan_says_so() {
        let text = render_report(&report(ReconciliationPlan::default()), false);
        assert!(text.starts_with("example.com: 2 remote, 2 declared, 1 restricted"));
        assert!(text.contains("No differences."));
        assert!(text.contains("api.example.com"));
    }

    #[test]
    fn plan_lines_are_marked() {
        let plan = ReconciliationPlan {
            to_create: vec![DnsRecord::new("A", "new.example.com", "1.2.3.4")],
            to_update: vec![PlannedUpdate {
                id: "r1".into(),
                record: DnsRecord::new("A", "www.example.com", "5.6.7.8").proxied(true),
                previous: DnsRecord::new("A", "www.example.com", "1.1.1.1"),
            }],
            to_delete: vec![DnsRecord::new("TXT", "old.example.com", "bye")],
        };
        let text = render_report(&report(plan), false);

        assert!(text.contains("+ A      new.example.com"));
        assert!(text.contains("~ A      www.example.com"));
        assert!(text.contains("was: 1.1.1.1"));
        assert!(text.contains("proxy: dns only -> proxied"));
        assert!(text.contains("- TXT    old.example.com"));
        assert!(text.contains("1 to create, 1 to update, 1 to delete"));
    }
}
