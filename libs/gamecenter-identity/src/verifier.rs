//! Entry point tying the fetcher, cache and signature check together.

use std::sync::Arc;

use crate::cache::CertificateCache;
use crate::certificate::CertificateKey;
use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::fetcher::{CertificateFetcher, CertificateTransport, HttpTransport};
use crate::signature::verify_signature;
use crate::token::IdentityToken;

/// Verifies Game Center identity tokens, caching certificate keys between calls.
///
/// Cheap to clone; clones share the HTTP client and the key cache.
#[derive(Clone)]
pub struct IdentityVerifier {
    fetcher: CertificateFetcher,
    cache: CertificateCache,
}

impl IdentityVerifier {
    /// Verifier that downloads certificates with `reqwest`.
    pub fn new(config: VerifierConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: VerifierConfig, transport: Arc<dyn CertificateTransport>) -> Self {
        Self {
            fetcher: CertificateFetcher::new(&config, transport),
            cache: CertificateCache::new(),
        }
    }

    pub fn cache(&self) -> &CertificateCache {
        &self.cache
    }

    /// Verify `token`, reusing a cached certificate key when available.
    pub async fn verify(&self, token: &IdentityToken) -> Result<bool, VerifyError> {
        self.verify_with_cache(token, true).await
    }

    /// Verify `token`. With `use_cache` false the certificate is always
    /// fetched and the cache is neither read nor written.
    ///
    /// `Ok(false)` means the signature does not match; `Err` means no verdict
    /// could be reached.
    pub async fn verify_with_cache(
        &self,
        token: &IdentityToken,
        use_cache: bool,
    ) -> Result<bool, VerifyError> {
        let key = self.resolve_key(&token.public_key_url, use_cache).await?;
        verify_signature(&key, token)
    }

    async fn resolve_key(
        &self,
        url: &str,
        use_cache: bool,
    ) -> Result<Arc<CertificateKey>, VerifyError> {
        if use_cache {
            if let Some(key) = self.cache.lookup(url) {
                tracing::debug!(%url, "certificate cache hit");
                return Ok(key);
            }
        }

        let fetched = self.fetcher.fetch(url).await?;
        let key = Arc::new(fetched.key);

        if use_cache {
            if let Some(ttl) = fetched.max_age {
                self.cache.insert(url, Arc::clone(&key), ttl);
            }
        }

        Ok(key)
    }
}
