// ── Restriction filter ──
//
// Removes records whose subdomain is reserved (mail, api, ...) from
// reconciliation, so a records file can never create or overwrite them.
// The subject matched is the name relative to the zone apex: `@` for the
// apex itself, `www` for `www.example.com`. Names outside the domain are
// matched unchanged.

use regex::Regex;
use tracing::debug;

use crate::error::CoreError;
use crate::model::DnsRecord;

/// Ordered, compiled restriction patterns.
#[derive(Debug, Clone, Default)]
pub struct RestrictionList {
    patterns: Vec<Regex>,
    anchored: bool,
}

/// Records split by whether a restriction matched them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub allowed: Vec<DnsRecord>,
    pub restricted: Vec<DnsRecord>,
}

impl RestrictionList {
    /// Compile every pattern, failing on the first malformed one.
    ///
    /// Unanchored patterns match anywhere in the subject (`api` matches
    /// `myapi`); anchored patterns must match the whole subject.
    pub fn compile<S: AsRef<str>>(patterns: &[S], anchored: bool) -> Result<Self, CoreError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let raw = p.as_ref();
                let source = if anchored {
                    format!("^(?:{raw})$")
                } else {
                    raw.to_owned()
                };
                Regex::new(&source).map_err(|e| CoreError::InvalidPattern {
                    pattern: raw.to_owned(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns, anchored })
    }

    /// A list that restricts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Whether `name` (FQDN or relative) is restricted within `domain`.
    pub fn is_restricted(&self, name: &str, domain: &str) -> bool {
        let subject = relative_name(name, domain);
        self.patterns.iter().any(|re| re.is_match(subject))
    }

    /// Split `records` into allowed and restricted, preserving order.
    pub fn partition(&self, records: Vec<DnsRecord>, domain: &str) -> Partition {
        let (restricted, allowed): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| self.is_restricted(&r.name, domain));

        for r in &restricted {
            debug!(name = %r.name, record_type = %r.record_type, "record restricted");
        }
        Partition {
            allowed,
            restricted,
        }
    }
}

/// Compile `patterns` and partition `records` in one step.
pub fn filter<S: AsRef<str>>(
    records: Vec<DnsRecord>,
    patterns: &[S],
    domain: &str,
    anchored: bool,
) -> Result<Partition, CoreError> {
    Ok(RestrictionList::compile(patterns, anchored)?.partition(records, domain))
}

/// `www.example.com` → `www`, `example.com` → `@`, anything else unchanged.
pub fn relative_name<'a>(name: &'a str, domain: &str) -> &'a str {
    let name = name.trim_end_matches('.');
    let domain = domain.trim_end_matches('.');
    if name.eq_ignore_ascii_case(domain) {
        return "@";
    }
    match name.len().checked_sub(domain.len() + 1) {
        Some(cut)
            if name.as_bytes()[cut] == b'.'
                && name[cut + 1..].eq_ignore_ascii_case(domain) =>
        {
            &name[..cut]
        }
        _ => name,
    }
}
