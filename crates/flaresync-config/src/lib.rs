//! Configuration for flaresync.
//!
//! TOML (or legacy JSON) domain lists merged with `FLARESYNC_` environment
//! overrides, credential resolution (env + keyring + plaintext), and
//! translation to `flaresync_core::DomainTarget`. The core engine never
//! reads config files itself.

mod env;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use flaresync_core::{DomainTarget, RecordType};

pub use env::{ENV_DOMAINS, domains_from_env};

/// Keyring service name tokens are stored under.
pub const KEYRING_SERVICE: &str = "flaresync";

/// Config file names probed in the working directory.
pub const LOCAL_CONFIG_FILES: &[&str] = &["flaresync.toml", "flaresync.json"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for domain '{domain}'")]
    NoCredentials { domain: String },

    #[error("invalid environment configuration: {reason}")]
    Env { reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Managed domains, reconciled in this order.
    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in seconds. Must be at least 1.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra CA certificate (PEM) trusted for API requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Record types for domains that list none.
    #[serde(default)]
    pub record_types: Vec<String>,

    #[serde(default)]
    pub anchored_restrictions: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            ca_cert: None,
            record_types: Vec::new(),
            anchored_restrictions: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// One managed domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Apex domain (e.g., "example.com").
    #[serde(default)]
    pub name: String,

    /// Cloudflare zone id.
    #[serde(default)]
    pub zone_id: String,

    /// API token in plaintext. Prefer `token_env` or the keyring.
    #[serde(default, alias = "cf_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Declared-records JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_file: Option<PathBuf>,

    /// Restrictions JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_file: Option<PathBuf>,

    /// Types to reconcile (default: A, CNAME).
    #[serde(default, alias = "record_type", skip_serializing_if = "Vec::is_empty")]
    pub record_types: Vec<String>,

    /// Override `defaults.anchored_restrictions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchored_restrictions: Option<bool>,
}

impl Config {
    /// Checks that do not depend on a particular domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file (`~/.config/flaresync/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "flaresync", "flaresync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("flaresync");
    p
}

/// Pick the config file: explicit path, then `./flaresync.toml`,
/// `./flaresync.json`, then the platform config file.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    LOCAL_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .unwrap_or_else(config_path)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults ← file ← `FLARESYNC_*` env (`__` nests, e.g.
/// `FLARESYNC_DEFAULTS__TIMEOUT=60`). A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    figment = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        figment.merge(Json::file(path))
    } else {
        figment.merge(Toml::file(path))
    };

    let figment = figment.merge(
        Env::prefixed("FLARESYNC_")
            .ignore(env::RESERVED_KEYS)
            .split("__"),
    );

    let config: Config = figment.extract()?;
    config.validate()?;
    debug!(path = %path.display(), domains = config.domains.len(), "config loaded");
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(domain: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, &format!("{domain}/token"))?)
}

/// Store a domain's token in the system keyring.
pub fn store_token(domain: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(domain)?.set_password(token)?;
    Ok(())
}

/// Resolve a domain's API token from the credential chain.
pub fn resolve_token(domain: &DomainConfig) -> Result<SecretString, ConfigError> {
    resolve_token_with(domain, |name| std::env::var(name).ok())
}

/// [`resolve_token`] with an explicit environment lookup.
pub fn resolve_token_with(
    domain: &DomainConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Domain's token_env → env var lookup
    if let Some(ref env_name) = domain.token_env {
        if let Some(val) = lookup(env_name).filter(|v| !v.trim().is_empty()) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(secret) = keyring_entry(&domain.name)
        .and_then(|e| e.get_password().map_err(ConfigError::from))
    {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(token) = domain.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(SecretString::from(token.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        domain: domain.name.clone(),
    })
}

// ── Translation to core targets ─────────────────────────────────────

fn parse_types(raw: &[String]) -> Result<Vec<RecordType>, ConfigError> {
    raw.iter()
        .map(|t| {
            let parsed = RecordType::from(t.as_str());
            if parsed.is_empty() {
                Err(ConfigError::Validation {
                    field: "record_types".into(),
                    reason: "record type cannot be empty".into(),
                })
            } else {
                Ok(parsed)
            }
        })
        .collect()
}

fn required<'a>(value: &'a str, field: &str, index: usize) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Validation {
            field: format!("domains[{index}].{field}"),
            reason: "is required".into(),
        });
    }
    Ok(value)
}

/// Build the engine target for `domains[index]`, API token included.
pub fn resolve_domain(
    domain: &DomainConfig,
    index: usize,
    defaults: &Defaults,
) -> Result<DomainTarget, ConfigError> {
    let mut target = resolve_local_domain(domain, index, defaults)?;
    target.token = resolve_token(domain)?;
    Ok(target)
}

/// [`resolve_domain`] without the credential chain, for verbs that only
/// touch local files. The target's token is empty.
pub fn resolve_local_domain(
    domain: &DomainConfig,
    index: usize,
    defaults: &Defaults,
) -> Result<DomainTarget, ConfigError> {
    let name = required(&domain.name, "name", index)?;
    let zone_id = required(&domain.zone_id, "zone_id", index)?;
    let record_file = domain
        .record_file
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: format!("domains[{index}].record_file"),
            reason: "is required".into(),
        })?;

    let types = if domain.record_types.is_empty() {
        &defaults.record_types
    } else {
        &domain.record_types
    };

    Ok(DomainTarget {
        name: name.to_owned(),
        zone_id: zone_id.to_owned(),
        token: SecretString::from(String::new()),
        record_file,
        restricted_file: domain
            .restricted_file
            .clone()
            .filter(|p| !p.as_os_str().is_empty()),
        record_types: parse_types(types)?,
        anchored_restrictions: domain
            .anchored_restrictions
            .unwrap_or(defaults.anchored_restrictions),
    })
}

/// Resolve every domain independently, in configuration order.
pub fn resolve_domains(cfg: &Config) -> Vec<(String, Result<DomainTarget, ConfigError>)> {
    cfg.domains
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.clone(), resolve_domain(d, i, &cfg.defaults)))
        .collect()
}
