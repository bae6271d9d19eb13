//! `flaresync list`: live records, or declared ones with `--local`.

use serde::Serialize;
use tabled::Tabled;

use flaresync_core::{ALL_RECORD_TYPES, DnsRecord, pipeline};

use crate::cli::ListArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::{DomainResults, run_domains, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Listed {
    domain: String,
    #[serde(flatten)]
    record: DnsRecord,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Proxied")]
    proxied: String,
    #[tabled(rename = "TTL")]
    ttl: String,
}

impl From<&Listed> for RecordRow {
    fn from(l: &Listed) -> Self {
        let r = &l.record;
        Self {
            domain: l.domain.clone(),
            record_type: r.record_type.to_string(),
            name: r.name.clone(),
            content: r.content.clone(),
            proxied: if r.proxied { "yes".into() } else { "no".into() },
            ttl: match r.ttl {
                0 => "-".into(),
                1 => "auto".into(),
                n => n.to_string(),
            },
        }
    }
}

fn plain_line(l: &Listed) -> String {
    let r = &l.record;
    format!("{}: {} -> {}\t{}", r.record_type, r.name, r.content, r.ttl)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>, args: &ListArgs) -> Result<(), CliError> {
    let requested = util::parse_types(&args.types)?;

    let results: DomainResults<Vec<Listed>> = if args.local {
        let targets = ctx.local_targets()?;
        DomainResults::from_results(
            targets
                .into_iter()
                .map(|(_, target)| -> Result<Vec<Listed>, CliError> {
                    let target = target?;
                    let types = requested.as_deref().unwrap_or(target.enabled_types());
                    let records = pipeline::list_local(&target, types)?;
                    Ok(tag(&target.name, records))
                })
                .collect(),
        )
    } else {
        let targets = ctx.targets()?;
        let types = requested.as_deref().unwrap_or(ALL_RECORD_TYPES);
        run_domains(targets, false, |target| async move {
            let client = ctx.client(&target)?;
            let records = pipeline::list_remote(&client, &target, types).await?;
            Ok(tag(&target.name, records))
        })
        .await
    };

    let listed: Vec<&Listed> = results.done.iter().flatten().collect();
    let out = output::render_list(
        ctx.output(),
        &listed,
        |l| RecordRow::from(*l),
        |l| plain_line(l),
    )?;
    output::print_output(&out, ctx.global.quiet);

    results.finish()
}

fn tag(domain: &str, records: Vec<DnsRecord>) -> Vec<Listed> {
    records
        .into_iter()
        .map(|record| Listed {
            domain: domain.to_owned(),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_humanize_ttl_and_proxy() {
        let listed = Listed {
            domain: "example.com".into(),
            record: DnsRecord::new("A", "www.example.com", "1.2.3.4").proxied(true),
        };
        let row = RecordRow::from(&listed);
        assert_eq!(row.ttl, "auto");
        assert_eq!(row.proxied, "yes");
        assert_eq!(plain_line(&listed), "A: www.example.com -> 1.2.3.4\t1");
    }
}
