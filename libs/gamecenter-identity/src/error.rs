//! Error kinds for identity verification.

use thiserror::Error;

/// Reasons a verification could not reach a verdict.
///
/// A signature that simply does not match is not an error: it is reported as
/// `Ok(false)` by the verifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The certificate URL failed the scheme or trusted-host check.
    #[error("{0}")]
    InvalidSource(String),
    /// The certificate could not be retrieved.
    #[error("certificate unavailable: {0}")]
    SourceUnavailable(String),
    /// The response body is not a usable certificate.
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),
    /// Token fields could not be decoded.
    #[error("malformed token: {0}")]
    MalformedToken(String),
}
