//! Turning the raw certificate served by the key host into an RSA public key.

use base64::{engine::general_purpose::STANDARD, Engine};
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use x509_parser::pem::parse_x509_pem;

use crate::error::VerifyError;

const PEM_HEADER: &str = "-----BEGIN CERTIFICATE-----\n";
const PEM_FOOTER: &str = "-----END CERTIFICATE-----";
const PEM_LINE_WIDTH: usize = 64;

/// Public key extracted from a provider certificate, ready to check signatures.
#[derive(Clone)]
pub struct CertificateKey {
    pem: String,
    key: RsaPublicKey,
}

impl CertificateKey {
    /// Build a key from the DER certificate bytes returned by the key host.
    pub fn from_certificate_der(der: &[u8]) -> Result<Self, VerifyError> {
        if der.is_empty() {
            return Err(VerifyError::MalformedCertificate(
                "empty certificate body".to_string(),
            ));
        }
        Self::from_pem(&der_to_pem(der))
    }

    /// Build a key from a PEM-armoured X.509 certificate.
    pub fn from_pem(pem: &str) -> Result<Self, VerifyError> {
        let (_, parsed) = parse_x509_pem(pem.as_bytes()).map_err(|e| {
            tracing::error!(?e, "certificate PEM decode failed");
            VerifyError::MalformedCertificate("invalid PEM encoding".to_string())
        })?;

        let cert = parsed.parse_x509().map_err(|e| {
            tracing::error!(?e, "certificate X.509 parse failed");
            VerifyError::MalformedCertificate("invalid X.509 certificate".to_string())
        })?;

        let key = RsaPublicKey::from_public_key_der(cert.public_key().raw).map_err(|e| {
            tracing::error!(?e, "certificate does not carry an RSA key");
            VerifyError::MalformedCertificate("unsupported public key".to_string())
        })?;

        Ok(Self {
            pem: pem.to_string(),
            key,
        })
    }

    /// The PEM text the key was parsed from.
    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// RSASSA-PKCS1-v1_5 check of `signature` over SHA-256(`message`).
    pub fn verify_sha256(&self, message: &[u8], signature: &[u8]) -> bool {
        let digest = Sha256::digest(message);
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .is_ok()
    }
}

impl std::fmt::Debug for CertificateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateKey")
            .field("pem_len", &self.pem.len())
            .finish_non_exhaustive()
    }
}

/// Wrap DER bytes as a PEM certificate, 64 base64 characters per line.
pub fn der_to_pem(der: &[u8]) -> String {
    let body = STANDARD.encode(der);

    let mut pem = String::from(PEM_HEADER);
    // base64 output is ASCII, so byte chunks are valid UTF-8.
    for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
        pem.push_str(std::str::from_utf8(line).unwrap_or_default());
        pem.push('\n');
    }
    pem.push_str(PEM_FOOTER);
    pem
}
