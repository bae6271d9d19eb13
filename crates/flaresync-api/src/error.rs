use thiserror::Error;

/// Top-level error type for the `flaresync-api` crate.
///
/// Covers every failure mode of the Cloudflare DNS API surface:
/// authentication, transport, API envelopes, and payload decoding.
/// `flaresync-core` maps these into provider errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected (HTTP 401/403 or a Cloudflare auth error code).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The token could not be turned into a header value.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup error (custom CA, client builder).
    #[error("TLS error: {0}")]
    Tls(String),

    /// Rate limited by the API. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Cloudflare API ──────────────────────────────────────────────
    /// Structured error from the `errors` array of the response envelope.
    #[error("Cloudflare API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<u32>,
        status: u16,
    },

    /// The envelope reported success but carried no `result`.
    #[error("Cloudflare API returned an empty result for {operation}")]
    EmptyResult { operation: &'static str },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
