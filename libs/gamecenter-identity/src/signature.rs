//! Rebuilding the signed message and checking the token signature.

use crate::certificate::CertificateKey;
use crate::codec::encode_timestamp_be;
use crate::error::VerifyError;
use crate::token::IdentityToken;

/// The exact bytes the signer hashed:
/// `player_id || bundle_id || timestamp (u64 BE) || salt`.
pub fn canonical_message(token: &IdentityToken) -> Result<Vec<u8>, VerifyError> {
    let salt = token.decoded_salt()?;

    let mut message =
        Vec::with_capacity(token.player_id.len() + token.bundle_id.len() + 8 + salt.len());
    message.extend_from_slice(token.player_id.as_bytes());
    message.extend_from_slice(token.bundle_id.as_bytes());
    message.extend_from_slice(&encode_timestamp_be(token.timestamp));
    message.extend_from_slice(&salt);
    Ok(message)
}

/// Check the token's signature against `key`.
///
/// Returns `Ok(false)` for a well-formed token whose signature does not match;
/// errors only when the salt or signature cannot be decoded.
pub fn verify_signature(key: &CertificateKey, token: &IdentityToken) -> Result<bool, VerifyError> {
    let message = canonical_message(token)?;
    let signature = token.decoded_signature()?;

    let valid = key.verify_sha256(&message, &signature);
    if !valid {
        tracing::debug!(player_id = %token.player_id, "identity signature mismatch");
    }
    Ok(valid)
}
