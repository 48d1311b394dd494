use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use gamecenter_identity::{
    CertificateTransport, IdentityVerifier, RawCertificateResponse, VerifyError,
};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::Url;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use identity_api::config::Config;
use identity_api::AppState;

const CERT_DER: &[u8] =
    include_bytes!("../../../../libs/gamecenter-identity/tests/fixtures/public.der");
const PRIVATE_PEM: &str =
    include_str!("../../../../libs/gamecenter-identity/tests/fixtures/private.pem");

pub const CERT_URL: &str = "https://static.gc.apple.com/public-key/gc-prod-test.cer";

/// Certificate host stub that serves the fixture certificate and counts requests.
pub struct CountingTransport {
    status: u16,
    cache_control: Option<&'static str>,
    calls: AtomicUsize,
}

impl CountingTransport {
    pub fn new(status: u16, cache_control: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            status,
            cache_control,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateTransport for CountingTransport {
    async fn get(&self, _url: &Url) -> Result<RawCertificateResponse, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut headers = HeaderMap::new();
        if let Some(value) = self.cache_control {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static(value));
        }
        Ok(RawCertificateResponse {
            status: self.status,
            headers,
            body: CERT_DER.to_vec(),
        })
    }
}

/// Build the app router with a stub certificate host.
pub fn test_app(config: Config, transport: Arc<CountingTransport>) -> Router {
    let verifier = IdentityVerifier::with_transport(config.verifier_config(), transport);
    let state = AppState::new(config, verifier);
    identity_api::routes::router().with_state(state)
}

/// A request body signed with the fixture key.
pub fn signed_request(player_id: &str, timestamp: u64) -> serde_json::Value {
    let bundle_id = "com.valid.app";
    let salt = [0x0f, 0x3a, 0xaa, 0xad];

    let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_PEM).expect("fixture private key");
    let signer = SigningKey::<Sha256>::new(key);

    let mut message = Vec::new();
    message.extend_from_slice(player_id.as_bytes());
    message.extend_from_slice(bundle_id.as_bytes());
    message.extend_from_slice(&timestamp.to_be_bytes());
    message.extend_from_slice(&salt);
    let signature = signer.sign(&message).to_bytes();

    serde_json::json!({
        "playerId": player_id,
        "bundleId": bundle_id,
        "timestamp": timestamp,
        "salt": STANDARD.encode(salt),
        "signature": STANDARD.encode(signature),
        "publicKeyUrl": CERT_URL,
    })
}
