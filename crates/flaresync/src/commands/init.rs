//! `flaresync init`: interactive setup of a config file and starter files.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Select};
use tracing::info;

use flaresync_config::{Config, Defaults, DomainConfig};
use flaresync_core::records_file;
use flaresync_core::{DeclaredRecord, DnsRecord, Owner};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util::prompt_err;

const CONFIG_FILE: &str = "flaresync.toml";

/// Patterns written into a new restrictions file.
const STARTER_RESTRICTIONS: &[&str] = &[
    "ww([0-9]+)",
    "api",
    "admin",
    "assets",
    "cdn",
    "dev",
    "git",
    "static",
    "x",
];

// ── Starter files ───────────────────────────────────────────────────

fn file_stem(domain: &str) -> String {
    domain.replace('.', "_")
}

fn default_record_file(domain: &str) -> String {
    format!("{}.json", file_stem(domain))
}

fn default_restricted_file(domain: &str) -> String {
    format!("restricted_{}.json", file_stem(domain))
}

fn starter_entries(domain: &str) -> Vec<DeclaredRecord> {
    vec![DeclaredRecord {
        description: format!("The root domain for {domain} website"),
        repo: "https://github.com/your-org/your-repo".into(),
        owner: Owner {
            username: "your-username".into(),
            email: "your-email@example.com".into(),
        },
        record: DnsRecord::new("A", "@", "192.0.2.1").proxied(true),
    }]
}

fn parse_type_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Create the domain's records and restrictions files unless they exist.
fn write_starter_files(domain: &DomainConfig) -> Result<(), CliError> {
    if let Some(path) = domain.restricted_file.as_deref().filter(|p| !p.exists()) {
        let patterns: Vec<String> = STARTER_RESTRICTIONS.iter().map(|p| (*p).to_owned()).collect();
        records_file::write_patterns(path, &patterns)?;
        info!(path = %path.display(), "created restrictions file");
    }
    if let Some(path) = domain.record_file.as_deref().filter(|p| !p.exists()) {
        records_file::write_entries(path, &starter_entries(&domain.name))?;
        info!(path = %path.display(), "created records file");
    }
    Ok(())
}

// ── Wizard ──────────────────────────────────────────────────────────

fn required_input(prompt: &str) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Err("a value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(prompt_err)?;
    Ok(value.trim().to_owned())
}

fn input_with_default(prompt: &str, default: String) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(value.trim().to_owned())
}

fn prompt_domain() -> Result<DomainConfig, CliError> {
    let name = required_input("Domain name (e.g. example.com)")?;
    let zone_id = required_input("Cloudflare zone ID")?;

    let token = rpassword::prompt_password("Cloudflare API token: ").map_err(prompt_err)?;
    let token = token.trim().to_owned();

    let storage = Select::new()
        .with_prompt("Store the token in")
        .items(&["System keyring", "Environment variable", "Config file (plaintext)"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut domain = DomainConfig {
        name,
        zone_id,
        ..DomainConfig::default()
    };
    match storage {
        0 => {
            flaresync_config::store_token(&domain.name, &token)?;
            info!(domain = %domain.name, "token stored in keyring");
        }
        1 => {
            let suggested = format!("CF_TOKEN_{}", file_stem(&domain.name).to_uppercase());
            let var = input_with_default("Environment variable name", suggested)?;
            eprintln!("Remember to export {var} before running flaresync.");
            domain.token_env = Some(var);
        }
        _ => domain.token = Some(token),
    }

    let record_file = input_with_default("Records file", default_record_file(&domain.name))?;
    domain.record_file = Some(PathBuf::from(record_file));
    domain.restricted_file = Some(PathBuf::from(default_restricted_file(&domain.name)));

    let types = input_with_default("Record types to manage", "A,CNAME".into())?;
    domain.record_types = parse_type_list(&types);

    Ok(domain)
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    if path.exists() {
        eprintln!(
            "Configuration file '{}' already exists. Skipping initialization.",
            path.display()
        );
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NotInteractive {
            action: "init".into(),
        });
    }

    eprintln!("Configure your domains:");
    let mut domains = Vec::new();
    loop {
        let domain = prompt_domain()?;
        write_starter_files(&domain)?;
        domains.push(domain);

        let another = Confirm::new()
            .with_prompt("Add another domain?")
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !another {
            break;
        }
    }

    save(&path, domains)?;
    if !global.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn save(path: &Path, domains: Vec<DomainConfig>) -> Result<(), CliError> {
    let cfg = Config {
        defaults: Defaults::default(),
        domains,
    };
    flaresync_config::save_config(&cfg, path)?;
    info!(path = %path.display(), "config initialized");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_file_names_follow_domain() {
        assert_eq!(default_record_file("example.co.uk"), "example_co_uk.json");
        assert_eq!(
            default_restricted_file("example.com"),
            "restricted_example_com.json"
        );
    }

    #[test]
    fn type_list_is_normalized() {
        assert_eq!(parse_type_list(" a, cname ,,txt"), vec!["A", "CNAME", "TXT"]);
    }

    #[test]
    fn starter_files_are_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("example_com.json");
        let restricted = dir.path().join("restricted_example_com.json");
        let domain = DomainConfig {
            name: "example.com".into(),
            record_file: Some(records.clone()),
            restricted_file: Some(restricted.clone()),
            ..DomainConfig::default()
        };

        write_starter_files(&domain).unwrap();
        let entries = records_file::load_entries(&records).unwrap();
        assert_eq!(entries, starter_entries("example.com"));
        assert_eq!(
            records_file::load_patterns(Some(&restricted)).unwrap().len(),
            STARTER_RESTRICTIONS.len()
        );

        std::fs::write(&records, "[]").unwrap();
        write_starter_files(&domain).unwrap();
        assert_eq!(std::fs::read_to_string(&records).unwrap(), "[]");
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flaresync.toml");
        let domain = DomainConfig {
            name: "example.com".into(),
            zone_id: "zone-1".into(),
            token_env: Some("CF_TOKEN_EXAMPLE_COM".into()),
            record_file: Some("example_com.json".into()),
            ..DomainConfig::default()
        };
        save(&path, vec![domain.clone()]).unwrap();

        let cfg = flaresync_config::load_config(&path).unwrap();
        assert_eq!(cfg.domains, vec![domain]);
    }
}
