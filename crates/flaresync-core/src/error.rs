// ── Core error types ──
//
// Errors surfaced by the reconciliation engine. Consumers never match on
// HTTP details directly: `From<flaresync_api::Error>` folds transport and
// envelope failures into `Provider*` variants, and `kind()` gives the
// coarse classification the binary turns into exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or local input files.
    Config,
    /// The DNS provider failed or rejected a call.
    Provider,
    /// Declared records violate a structural rule.
    Validation,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration / local input ──────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid restriction pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Cannot read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid record #{index}: {message}")]
    Validation { index: usize, message: String },

    // ── Provider ─────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Provider request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider error: {message}")]
    Provider {
        message: String,
        code: Option<u32>,
        status: Option<u16>,
    },

    // ── Context ──────────────────────────────────────────────────────
    #[error("{domain}: {source}")]
    Domain {
        domain: String,
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. }
            | Self::InvalidPattern { .. }
            | Self::ReadFile { .. }
            | Self::WriteFile { .. }
            | Self::ParseFile { .. } => ErrorKind::Config,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::AuthenticationFailed { .. } | Self::Timeout { .. } | Self::Provider { .. } => {
                ErrorKind::Provider
            }
            Self::Domain { source, .. } => source.kind(),
        }
    }

    /// Attach the failing domain. Already-wrapped errors are left alone.
    #[must_use]
    pub fn in_domain(self, domain: &str) -> Self {
        match self {
            Self::Domain { .. } => self,
            other => Self::Domain {
                domain: domain.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any domain context peeled off.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Domain { source, .. } => source.root(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<flaresync_api::Error> for CoreError {
    fn from(err: flaresync_api::Error) -> Self {
        use flaresync_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::InvalidToken(reason) => CoreError::Config {
                message: format!("Invalid API token: {reason}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::Transport(ref e) if e.is_timeout() => CoreError::Timeout { timeout_secs: 0 },
            Api::Transport(e) => CoreError::Provider {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
                code: None,
            },
            Api::RateLimited { retry_after_secs } => CoreError::Provider {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: None,
                status: Some(429),
            },
            Api::Api {
                message,
                code,
                status,
            } => CoreError::Provider {
                message,
                code,
                status: Some(status),
            },
            Api::EmptyResult { operation } => CoreError::Provider {
                message: format!("Provider returned no result for {operation}"),
                code: None,
                status: None,
            },
            Api::Deserialization { message, body: _ } => CoreError::Provider {
                message: format!("Unexpected response: {message}"),
                code: None,
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_context_keeps_kind() {
        let err = CoreError::Validation {
            index: 2,
            message: "record name cannot be empty".into(),
        }
        .in_domain("example.com");

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "example.com: Invalid record #2: record name cannot be empty"
        );
    }

    #[test]
    fn domain_context_is_not_nested() {
        let err = CoreError::Config {
            message: "x".into(),
        }
        .in_domain("a.com")
        .in_domain("b.com");

        match &err {
            CoreError::Domain { domain, .. } => assert_eq!(domain, "a.com"),
            other => panic!("expected Domain, got {other:?}"),
        }
        assert!(matches!(err.root(), CoreError::Config { .. }));
    }

    #[test]
    fn api_errors_map_to_provider_kind() {
        let err: CoreError = flaresync_api::Error::Api {
            message: "Record already exists.".into(),
            code: Some(81057),
            status: 400,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Provider);

        let err: CoreError = flaresync_api::Error::Authentication {
            message: "bad token".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));

        let err: CoreError = flaresync_api::Error::Timeout { timeout_secs: 30 }.into();
        assert_eq!(err.kind(), ErrorKind::Provider);
    }

    #[test]
    fn pattern_errors_are_config_kind() {
        let err = CoreError::InvalidPattern {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
