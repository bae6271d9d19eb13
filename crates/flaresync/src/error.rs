//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text, and each error into a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use flaresync_config::ConfigError;
use flaresync_core::{CoreError, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const VALIDATION: i32 = 5;
    pub const PARTIAL_FAILURE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Provider ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(flaresync::auth_failed),
        help(
            "Check the domain's API token and that it has DNS edit permission on the zone.\n\
             Tokens resolve from token_env, then the keyring, then the config file."
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for domain '{domain}'")]
    #[diagnostic(
        code(flaresync::no_credentials),
        help(
            "Set `token` or `token_env` for the domain in the config file,\n\
             or store one in the keyring with: flaresync init"
        )
    )]
    NoCredentials { domain: String },

    #[error("{message}")]
    #[diagnostic(
        code(flaresync::timeout),
        help("Increase the timeout with --timeout or `defaults.timeout`.")
    )]
    Timeout { message: String },

    #[error("{message}")]
    #[diagnostic(code(flaresync::provider))]
    Provider { message: String },

    // ── Local input ──────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(flaresync::local_input),
        help("Check the records and restricted files configured for the domain.")
    )]
    LocalInput { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(flaresync::invalid_record),
        help("Every record needs a type, a name and content. Run: flaresync fmt --check")
    )]
    InvalidRecord { message: String },

    #[error("Records check failed for {domains} domain(s)")]
    #[diagnostic(
        code(flaresync::check_failed),
        help("Restricted names are declared. Run: flaresync fmt")
    )]
    CheckFailed { domains: usize },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No domains configured")]
    #[diagnostic(
        code(flaresync::no_domains),
        help(
            "Create a config with: flaresync init\n\
             Expected at: {path}"
        )
    )]
    NoDomains { path: String },

    #[error("Domain '{name}' is not configured")]
    #[diagnostic(
        code(flaresync::unknown_domain),
        help("Configured domains: {available}")
    )]
    UnknownDomain { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(
        code(flaresync::config),
        help("Run: flaresync config show")
    )]
    Config(ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(flaresync::validation))]
    Validation { field: String, reason: String },

    // ── Aggregate ────────────────────────────────────────────────────
    #[error("{failed} of {total} domain(s) did not complete cleanly")]
    #[diagnostic(
        code(flaresync::partial_failure),
        help("Failed domains and records are listed above. Re-run with -v for details.")
    )]
    PartialFailure { failed: usize, total: usize },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs an interactive terminal")]
    #[diagnostic(
        code(flaresync::not_interactive),
        help("Run it from a terminal, or pass --yes where supported.")
    )]
    NotInteractive { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(flaresync::render))]
    Render { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Provider { .. } => exit_code::CONNECTION,
            Self::LocalInput { .. }
            | Self::NoDomains { .. }
            | Self::UnknownDomain { .. }
            | Self::Config(_) => exit_code::CONFIG,
            Self::InvalidRecord { .. } | Self::CheckFailed { .. } => exit_code::VALIDATION,
            Self::Validation { .. } | Self::NotInteractive { .. } => exit_code::USAGE,
            Self::PartialFailure { .. } => exit_code::PARTIAL_FAILURE,
            Self::Io(_) | Self::Render { .. } => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        // The message keeps the domain prefix; the variant follows the root cause.
        let message = err.to_string();
        match (err.kind(), err.root()) {
            (_, CoreError::AuthenticationFailed { .. }) => Self::AuthFailed { message },
            (_, CoreError::Timeout { .. }) => Self::Timeout { message },
            (ErrorKind::Provider, _) => Self::Provider { message },
            (ErrorKind::Validation, _) => Self::InvalidRecord { message },
            (ErrorKind::Config, _) => Self::LocalInput { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { domain } => Self::NoCredentials { domain },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_domain_context() {
        let err = CoreError::AuthenticationFailed {
            message: "bad token".into(),
        }
        .in_domain("example.com");
        let cli = CliError::from(err);
        assert_eq!(cli.exit_code(), exit_code::AUTH);
        assert!(cli.to_string().starts_with("example.com: "));
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let provider = CliError::from(CoreError::Provider {
            message: "boom".into(),
            code: Some(1000),
            status: Some(500),
        });
        assert_eq!(provider.exit_code(), exit_code::CONNECTION);

        let invalid = CliError::from(CoreError::Validation {
            index: 2,
            message: "record name cannot be empty".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::VALIDATION);

        let timeout = CliError::from(CoreError::Timeout { timeout_secs: 5 }.in_domain("a.com"));
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let missing = CliError::from(ConfigError::NoCredentials {
            domain: "a.com".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::AUTH);
    }
}
