//! Verification of Game Center identity signatures.
//!
//! A game client hands its server an identity token (player id, bundle id,
//! timestamp, salt, signature and the URL of the signing certificate). The
//! server rebuilds the signed message, fetches the certificate and checks the
//! signature. Fetched keys are cached for as long as the certificate host's
//! `Cache-Control: max-age` allows.

pub mod cache;
pub mod certificate;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod signature;
pub mod token;
pub mod verifier;

pub use cache::CertificateCache;
pub use certificate::CertificateKey;
pub use codec::encode_timestamp_be;
pub use config::VerifierConfig;
pub use error::VerifyError;
pub use fetcher::{CertificateFetcher, CertificateTransport, HttpTransport, RawCertificateResponse};
pub use signature::verify_signature;
pub use token::IdentityToken;
pub use verifier::IdentityVerifier;
