// Cloudflare v4 HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, URL construction and
// envelope unwrapping. Endpoint methods live in `records.rs` as inherent
// methods, keeping this module focused on transport mechanics.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Public Cloudflare API root.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4/";

// Cloudflare reports bad or under-scoped tokens with these codes even on
// some non-401 responses.
const AUTH_ERROR_CODES: &[u32] = &[9103, 9106, 9109, 10000];

/// Async client for the Cloudflare v4 API, bound to a single API token.
///
/// One instance per token: `flaresync` builds a client per configured
/// domain, so credentials never leak between zones.
#[derive(Debug)]
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CloudflareClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the public API from a token and transport config.
    pub fn new(token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, token, transport)
    }

    /// Build a client against an arbitrary API root (mock servers, proxies).
    ///
    /// Injects `Authorization: Bearer <token>` as a sensitive default header.
    pub fn with_base_url(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout: transport.timeout,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"zones/{id}/dns_records"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.handle_envelope(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    fn send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Decode the `{ success, errors, result }` envelope.
    ///
    /// A non-empty `errors` array is always an error, whatever the HTTP
    /// status. `success = false` with no errors is passed through so the
    /// caller can decide (listing stops paginating on it).
    async fn handle_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(Error::RateLimited { retry_after_secs });
        }

        let body = resp.text().await.map_err(|e| self.send_error(e))?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(e) if status.is_success() => {
                let preview = body.chars().take(200).collect::<String>();
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                });
            }
            Err(_) => return Err(Self::status_error(status, body)),
        };

        if let Some(first) = envelope.errors.first() {
            let message = first.message.clone();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
                || AUTH_ERROR_CODES.contains(&first.code)
            {
                return Err(Error::Authentication { message });
            }
            return Err(Error::Api {
                message,
                code: Some(first.code),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(Self::status_error(status, String::new()));
        }

        Ok(envelope)
    }

    fn status_error(status: reqwest::StatusCode, raw: String) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Authentication {
                message: status.to_string(),
            };
        }
        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() { status.to_string() } else { raw },
            code: None,
        }
    }
}
