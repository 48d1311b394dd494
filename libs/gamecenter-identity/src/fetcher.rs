//! Retrieval of provider certificates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use reqwest::Url;

use crate::certificate::CertificateKey;
use crate::config::VerifierConfig;
use crate::error::VerifyError;

/// Response of a certificate GET, kept only until the key is extracted.
#[derive(Debug, Clone)]
pub struct RawCertificateResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Abstraction over the HTTPS GET used to download certificates.
///
/// Backed by `reqwest` in production and an in-memory stub in tests.
#[async_trait]
pub trait CertificateTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawCertificateResponse, VerifyError>;
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CertificateTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawCertificateResponse, VerifyError> {
        let resp = self.http.get(url.clone()).send().await.map_err(|e| {
            tracing::error!(?e, %url, "certificate fetch failed");
            VerifyError::SourceUnavailable(e.to_string())
        })?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|e| {
            tracing::error!(?e, %url, "certificate body read failed");
            VerifyError::SourceUnavailable(e.to_string())
        })?;

        Ok(RawCertificateResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// A downloaded key and how long the host allows it to be reused.
#[derive(Debug, Clone)]
pub struct FetchedCertificate {
    pub key: CertificateKey,
    /// `None` when the response must not be cached.
    pub max_age: Option<Duration>,
}

/// Validates certificate URLs and downloads the keys behind them.
#[derive(Clone)]
pub struct CertificateFetcher {
    transport: Arc<dyn CertificateTransport>,
    trusted_host_suffix: String,
}

impl CertificateFetcher {
    pub fn new(config: &VerifierConfig, transport: Arc<dyn CertificateTransport>) -> Self {
        Self {
            transport,
            trusted_host_suffix: config.trusted_host_suffix.clone(),
        }
    }

    /// Check that `url` is HTTPS on a trusted host. Performs no I/O.
    pub fn validate_source(&self, url: &str) -> Result<Url, VerifyError> {
        let parsed = Url::parse(url)
            .map_err(|e| VerifyError::InvalidSource(format!("Invalid publicKeyUrl: {e}")))?;

        if parsed.scheme() != "https" {
            return Err(VerifyError::InvalidSource(
                "Invalid publicKeyUrl: should use https".to_string(),
            ));
        }

        let host = parsed.host_str().unwrap_or_default();
        if !host.ends_with(&self.trusted_host_suffix) {
            return Err(VerifyError::InvalidSource(format!(
                "Invalid publicKeyUrl: host should be {}",
                self.trusted_host_suffix.trim_start_matches('.')
            )));
        }

        Ok(parsed)
    }

    /// Download and decode the certificate at `url`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedCertificate, VerifyError> {
        let url = self.validate_source(url)?;
        tracing::info!(%url, "fetching Game Center certificate");

        let resp = self.transport.get(&url).await?;
        if resp.status != 200 {
            tracing::warn!(%url, status = resp.status, "unexpected certificate status");
            return Err(VerifyError::SourceUnavailable(format!(
                "HTTP status: {}, expected 200.",
                resp.status
            )));
        }

        let key = CertificateKey::from_certificate_der(&resp.body)?;
        let max_age = max_age_from_headers(&resp.headers);

        Ok(FetchedCertificate { key, max_age })
    }
}

/// Longest time a fetched certificate key is reused, whatever the host says.
pub const MAX_CERT_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// `max-age` from the first such directive in the `Cache-Control` header(s).
///
/// Only the first `max-age` counts: a zero or unparsable value means the key
/// must not be cached even if a later directive would allow it. Values above
/// [`MAX_CERT_TTL`] are clamped.
pub fn max_age_from_headers(headers: &HeaderMap) -> Option<Duration> {
    let value = headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .find_map(|directive| {
            let (name, value) = directive.trim().split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("max-age")
                .then(|| value.trim().trim_matches('"'))
        })?;

    let secs = value.parse::<u64>().ok().filter(|secs| *secs > 0)?;
    Some(Duration::from_secs(secs).min(MAX_CERT_TTL))
}
