// Environment-only domain configuration.
//
// For CI: when `FLARESYNC_DOMAINS` is set, domains come from parallel
// comma-separated lists instead of the config file:
//
//   FLARESYNC_DOMAINS="example.com,example.org"
//   FLARESYNC_CF_TOKENS="t1,t2"
//   FLARESYNC_ZONE_IDS="z1,z2"
//   FLARESYNC_RECORD_FILES="com.json,org.json"
//   FLARESYNC_RESTRICTED_FILES="restricted.json,"      (optional)
//   FLARESYNC_ALLOWED_TYPES="A,CNAME;A,CNAME,TXT"      (optional, `;` per domain)

use std::path::PathBuf;

use crate::{ConfigError, DomainConfig};

pub const ENV_DOMAINS: &str = "FLARESYNC_DOMAINS";
const ENV_TOKENS: &str = "FLARESYNC_CF_TOKENS";
const ENV_ZONES: &str = "FLARESYNC_ZONE_IDS";
const ENV_RECORD_FILES: &str = "FLARESYNC_RECORD_FILES";
const ENV_RESTRICTED_FILES: &str = "FLARESYNC_RESTRICTED_FILES";
const ENV_ALLOWED_TYPES: &str = "FLARESYNC_ALLOWED_TYPES";

/// Keys (after the `FLARESYNC_` prefix) figment must not treat as config.
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "domains",
    "cf_tokens",
    "zone_ids",
    "record_files",
    "restricted_files",
    "allowed_types",
    "config",
];

fn split_list(raw: &str, sep: char) -> Vec<String> {
    raw.split(sep).map(|s| s.trim().to_owned()).collect()
}

fn list(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    expected: usize,
    required: bool,
) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(raw) = lookup(var).filter(|v| !v.trim().is_empty()) else {
        if required {
            return Err(ConfigError::Env {
                reason: format!("{var} is missing or empty"),
            });
        }
        return Ok(None);
    };
    let items = split_list(&raw, ',');
    if items.len() != expected {
        return Err(ConfigError::Env {
            reason: format!(
                "{var} has {} entries but {ENV_DOMAINS} has {expected}",
                items.len()
            ),
        });
    }
    Ok(Some(items))
}

/// Domains from the environment, or `None` when `FLARESYNC_DOMAINS` is unset.
pub fn domains_from_env(
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<Result<Vec<DomainConfig>, ConfigError>> {
    let raw = lookup(ENV_DOMAINS).filter(|v| !v.trim().is_empty())?;
    Some(parse(&raw, &lookup))
}

fn parse(
    raw_domains: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Vec<DomainConfig>, ConfigError> {
    let names = split_list(raw_domains, ',');
    let n = names.len();

    let tokens = list(lookup, ENV_TOKENS, n, true)?.unwrap_or_default();
    let zones = list(lookup, ENV_ZONES, n, true)?.unwrap_or_default();
    let record_files = list(lookup, ENV_RECORD_FILES, n, true)?.unwrap_or_default();
    let restricted_files = list(lookup, ENV_RESTRICTED_FILES, n, false)?;

    let allowed_types = match lookup(ENV_ALLOWED_TYPES).filter(|v| !v.trim().is_empty()) {
        Some(raw) => {
            let per_domain: Vec<_> = raw.split(';').collect();
            if per_domain.len() != n {
                return Err(ConfigError::Env {
                    reason: format!(
                        "{ENV_ALLOWED_TYPES} has {} entries but {ENV_DOMAINS} has {n}",
                        per_domain.len()
                    ),
                });
            }
            Some(
                per_domain
                    .into_iter()
                    .map(|d| {
                        split_list(d, ',')
                            .into_iter()
                            .filter(|t| !t.is_empty())
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };

    let non_empty_path = |s: &String| (!s.is_empty()).then(|| PathBuf::from(s));

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| DomainConfig {
            name,
            zone_id: zones[i].clone(),
            token: Some(tokens[i].clone()).filter(|t| !t.is_empty()),
            token_env: None,
            record_file: non_empty_path(&record_files[i]),
            restricted_file: restricted_files.as_ref().and_then(|f| non_empty_path(&f[i])),
            record_types: allowed_types
                .as_ref()
                .map(|t| t[i].clone())
                .unwrap_or_default(),
            anchored_restrictions: None,
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn unset_domains_means_file_mode() {
        assert!(domains_from_env(env(&[])).is_none());
        assert!(domains_from_env(env(&[(ENV_DOMAINS, "  ")])).is_none());
    }

    #[test]
    fn parallel_lists_build_domains() {
        let domains = domains_from_env(env(&[
            (ENV_DOMAINS, "example.com, example.org"),
            (ENV_TOKENS, "t1,t2"),
            (ENV_ZONES, "z1,z2"),
            (ENV_RECORD_FILES, "com.json,org.json"),
            (ENV_RESTRICTED_FILES, "restricted.json,"),
            (ENV_ALLOWED_TYPES, "A,CNAME;TXT"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(domains.len(), 2);
        assert_eq!(domains[1].name, "example.org");
        assert_eq!(domains[1].token.as_deref(), Some("t2"));
        assert_eq!(
            domains[0].restricted_file.as_deref(),
            Some(std::path::Path::new("restricted.json"))
        );
        assert_eq!(domains[1].restricted_file, None);
        assert_eq!(domains[0].record_types, vec!["A", "CNAME"]);
        assert_eq!(domains[1].record_types, vec!["TXT"]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = domains_from_env(env(&[
            (ENV_DOMAINS, "example.com,example.org"),
            (ENV_TOKENS, "t1"),
            (ENV_ZONES, "z1,z2"),
            (ENV_RECORD_FILES, "a.json,b.json"),
        ]))
        .unwrap()
        .unwrap_err();
        assert!(err.to_string().contains(ENV_TOKENS));
    }

    #[test]
    fn missing_required_list_is_an_error() {
        let result = domains_from_env(env(&[
            (ENV_DOMAINS, "example.com"),
            (ENV_TOKENS, "t1"),
            (ENV_RECORD_FILES, "a.json"),
        ]))
        .unwrap();
        assert!(matches!(result, Err(ConfigError::Env { .. })));
    }

    #[test]
    fn allowed_types_must_match_domain_count() {
        let result = domains_from_env(env(&[
            (ENV_DOMAINS, "example.com"),
            (ENV_TOKENS, "t1"),
            (ENV_ZONES, "z1"),
            (ENV_RECORD_FILES, "a.json"),
            (ENV_ALLOWED_TYPES, "A;CNAME"),
        ]))
        .unwrap();
        assert!(result.is_err());
    }
}
