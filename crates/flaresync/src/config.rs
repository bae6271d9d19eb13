//! Config loading and per-domain resolution for the CLI.
//!
//! Wraps `flaresync-config`: picks the config file, applies env-only domain
//! lists, narrows to `--domain`, and builds one API client per domain.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use flaresync_api::{CloudflareClient, TransportConfig};
use flaresync_config::{Config, DomainConfig};
use flaresync_core::{CoreError, DomainTarget};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// One domain's target, or why it could not be built.
pub type Resolved = (String, Result<DomainTarget, CliError>);

/// Loaded configuration plus the global flags that shape it.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub path: PathBuf,
    pub config: Config,
}

impl<'a> Context<'a> {
    /// Load the config file, then let `FLARESYNC_DOMAINS` replace its domains.
    pub fn load(global: &'a GlobalOpts) -> Result<Self, CliError> {
        let path = flaresync_config::resolve_config_path(global.config.as_deref());
        let mut config = flaresync_config::load_config(&path)?;

        if let Some(env_domains) = flaresync_config::domains_from_env(|k| std::env::var(k).ok()) {
            config.domains = env_domains?;
            debug!(
                domains = config.domains.len(),
                "using domains from {}",
                flaresync_config::ENV_DOMAINS
            );
        }

        Ok(Self {
            global,
            path,
            config,
        })
    }

    /// Configured domains narrowed to `--domain`, in config order.
    pub fn selected(&self) -> Result<Vec<(usize, &DomainConfig)>, CliError> {
        if self.config.domains.is_empty() {
            return Err(CliError::NoDomains {
                path: self.path.display().to_string(),
            });
        }

        for wanted in &self.global.domain {
            if !self.config.domains.iter().any(|d| &d.name == wanted) {
                return Err(CliError::UnknownDomain {
                    name: wanted.clone(),
                    available: self
                        .config
                        .domains
                        .iter()
                        .map(|d| d.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }

        Ok(self
            .config
            .domains
            .iter()
            .enumerate()
            .filter(|(_, d)| self.global.domain.is_empty() || self.global.domain.contains(&d.name))
            .collect())
    }

    /// Targets with API tokens, for verbs that call Cloudflare.
    pub fn targets(&self) -> Result<Vec<Resolved>, CliError> {
        Ok(self
            .selected()?
            .into_iter()
            .map(|(i, d)| {
                let target = flaresync_config::resolve_domain(d, i, &self.config.defaults)
                    .map_err(CliError::from);
                (d.name.clone(), target)
            })
            .collect())
    }

    /// Targets without credentials, for verbs that only read local files.
    pub fn local_targets(&self) -> Result<Vec<Resolved>, CliError> {
        Ok(self
            .selected()?
            .into_iter()
            .map(|(i, d)| {
                let target = flaresync_config::resolve_local_domain(d, i, &self.config.defaults)
                    .map_err(CliError::from);
                (d.name.clone(), target)
            })
            .collect())
    }

    /// Per-request timeout: `--timeout`, else `defaults.timeout`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.global.timeout.unwrap_or(self.config.defaults.timeout))
    }

    /// An API client bound to `target`'s token.
    pub fn client(&self, target: &DomainTarget) -> Result<CloudflareClient, CliError> {
        let mut transport = TransportConfig::default().with_timeout(self.timeout());
        if let Some(ca) = &self.config.defaults.ca_cert {
            transport = transport.with_ca_cert(ca);
        }
        let client = match self.global.api_url.as_deref() {
            Some(url) => CloudflareClient::with_base_url(url, &target.token, &transport),
            None => CloudflareClient::new(&target.token, &transport),
        };
        client.map_err(|e| CliError::from(CoreError::from(e).in_domain(&target.name)))
    }

    /// `--output`, else `defaults.output`, else table.
    pub fn output(&self) -> OutputFormat {
        self.global
            .output
            .or_else(|| OutputFormat::from_str(&self.config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> bool {
        let mode = self
            .global
            .color
            .or_else(|| ColorMode::from_str(&self.config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);
        output::should_color(mode)
    }
}
