//! `flaresync fmt`: canonicalize records files, or check them with `--check`.

use std::fmt::Write;

use serde::Serialize;
use tracing::info;

use flaresync_core::{CheckReport, DomainTarget, FormatOutcome, pipeline};

use crate::cli::FmtArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, Tone, paint};

use super::{DomainResults, util};

#[derive(Serialize)]
struct Formatted {
    domain: String,
    #[serde(flatten)]
    outcome: FormatOutcome,
}

pub fn handle(ctx: &Context<'_>, args: &FmtArgs) -> Result<(), CliError> {
    let targets = ctx.local_targets()?;
    if args.check {
        return check(ctx, targets);
    }

    let results = DomainResults::from_results(
        targets
            .into_iter()
            .map(|(_, target)| format_one(ctx, &target?))
            .collect(),
    );

    let out = output::render_single(ctx.output(), &results.done, |done| {
        done.iter().map(render_formatted).collect::<Vec<_>>().join("\n")
    })?;
    output::print_output(&out, ctx.global.quiet);
    results.finish()
}

fn format_one(ctx: &Context<'_>, target: &DomainTarget) -> Result<Formatted, CliError> {
    let mut outcome = pipeline::format(target, false)?;

    if !outcome.restricted.is_empty() {
        let prompt = format!(
            "{}: remove {} restricted record(s) from {}?",
            target.name,
            outcome.restricted.len(),
            target.record_file.display()
        );
        if util::confirm(&prompt, ctx.global.yes)? {
            outcome = pipeline::format(target, true)?;
        } else {
            info!(domain = %target.name, "restricted records kept");
        }
    }

    Ok(Formatted {
        domain: target.name.clone(),
        outcome,
    })
}

fn render_formatted(f: &Formatted) -> String {
    let o = &f.outcome;
    let mut line = format!(
        "{}: {} formatted, {} removed, {}",
        f.domain,
        o.changed,
        o.removed,
        if o.written { "file rewritten" } else { "file unchanged" }
    );
    if !o.restricted.is_empty() {
        let _ = write!(line, ", {} restricted kept", o.restricted.len());
    }
    line
}

// ── --check ─────────────────────────────────────────────────────────

fn check(ctx: &Context<'_>, targets: Vec<crate::config::Resolved>) -> Result<(), CliError> {
    let results = DomainResults::from_results(
        targets
            .into_iter()
            .map(|(_, target)| -> Result<CheckReport, CliError> {
                Ok(pipeline::check(&target?)?)
            })
            .collect(),
    );

    let color = ctx.color();
    let out = output::render_single(ctx.output(), &results.done, |reports| {
        reports
            .iter()
            .map(|r| render_check(r, color))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, ctx.global.quiet);

    let failed = results.done.iter().filter(|r| !r.passed()).count();
    results.finish()?;
    if failed > 0 {
        return Err(CliError::CheckFailed { domains: failed });
    }
    Ok(())
}

fn render_check(report: &CheckReport, color: bool) -> String {
    let mut out = String::new();
    let status = if report.passed() {
        paint("PASS", Tone::Added, color)
    } else {
        paint("FAIL", Tone::Removed, color)
    };
    let _ = writeln!(
        out,
        "{status} {}: {} record(s), {} warning(s), {} restricted",
        report.domain,
        report.entries,
        report.warnings.len(),
        report.restricted.len()
    );
    for w in &report.warnings {
        let line = format!("warn #{} {}: {}", w.index, w.name, w.message);
        let _ = writeln!(out, "  {}", paint(&line, Tone::Changed, color));
    }
    for r in &report.restricted {
        let line = format!("restricted {} {} -> {}", r.record_type, r.name, r.content);
        let _ = writeln!(out, "  {}", paint(&line, Tone::Removed, color));
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use flaresync_core::{CheckWarning, DnsRecord};

    use super::*;

    #[test]
    fn check_summary_reports_findings() {
        let report = CheckReport {
            domain: "example.com".into(),
            entries: 3,
            warnings: vec![CheckWarning {
                index: 2,
                name: "www".into(),
                message: "proxy disabled".into(),
            }],
            restricted: vec![DnsRecord::new("CNAME", "api", "x.example.net")],
        };
        let text = render_check(&report, false);
        assert!(text.starts_with("FAIL example.com: 3 record(s), 1 warning(s), 1 restricted"));
        assert!(text.contains("warn #2 www: proxy disabled"));
        assert!(text.contains("restricted CNAME api -> x.example.net"));
    }

    #[test]
    fn format_summary_mentions_write() {
        let f = Formatted {
            domain: "example.com".into(),
            outcome: FormatOutcome {
                changed: 2,
                written: true,
                ..FormatOutcome::default()
            },
        };
        assert_eq!(
            render_formatted(&f),
            "example.com: 2 formatted, 0 removed, file rewritten"
        );
    }
}
