use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use gamecenter_identity::{CertificateTransport, IdentityToken, RawCertificateResponse, VerifyError};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::Url;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

pub const CERT_DER: &[u8] = include_bytes!("../fixtures/public.der");
pub const PRIVATE_PEM: &str = include_str!("../fixtures/private.pem");
/// A key unrelated to the fixture certificate.
pub const OTHER_PRIVATE_PEM: &str = include_str!("../fixtures/other_private.pem");

pub const CERT_URL: &str = "https://valid.apple.com/public/public.cer";

/// Token with an empty signature; call [`sign`] to fill it in.
pub fn unsigned_token(timestamp: u64) -> IdentityToken {
    IdentityToken {
        player_id: "G:1111111".to_string(),
        bundle_id: "com.valid.app".to_string(),
        timestamp,
        salt: "saltST==".to_string(),
        signature: String::new(),
        public_key_url: CERT_URL.to_string(),
    }
}

/// Sign the token the way GameKit does: SHA-256 with RSA PKCS#1 v1.5 over
/// player id, bundle id, big-endian timestamp and raw salt.
pub fn sign(token: &mut IdentityToken, private_pem: &str) {
    let key = RsaPrivateKey::from_pkcs8_pem(private_pem).expect("fixture private key");
    let signer = SigningKey::<Sha256>::new(key);

    let mut message = Vec::new();
    message.extend_from_slice(token.player_id.as_bytes());
    message.extend_from_slice(token.bundle_id.as_bytes());
    message.extend_from_slice(&token.timestamp.to_be_bytes());
    message.extend_from_slice(&token.decoded_salt().expect("fixture salt"));

    token.signature = STANDARD.encode(signer.sign(&message).to_bytes());
}

pub fn signed_token(timestamp: u64) -> IdentityToken {
    let mut token = unsigned_token(timestamp);
    sign(&mut token, PRIVATE_PEM);
    token
}

/// In-memory certificate host that counts requests.
pub struct StubTransport {
    status: u16,
    body: Vec<u8>,
    cache_control: Option<String>,
    unreachable: bool,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn serving_certificate() -> Self {
        Self {
            status: 200,
            body: CERT_DER.to_vec(),
            cache_control: None,
            unreachable: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::serving_certificate()
        }
    }

    pub fn with_cache_control(mut self, value: &str) -> Self {
        self.cache_control = Some(value.to_string());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl CertificateTransport for StubTransport {
    async fn get(&self, _url: &Url) -> Result<RawCertificateResponse, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(VerifyError::SourceUnavailable("connection refused".to_string()));
        }

        let mut headers = HeaderMap::new();
        if let Some(value) = &self.cache_control {
            headers.insert(CACHE_CONTROL, HeaderValue::from_str(value).unwrap());
        }

        Ok(RawCertificateResponse {
            status: self.status,
            headers,
            body: self.body.clone(),
        })
    }
}
