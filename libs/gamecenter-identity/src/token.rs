use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Standard-alphabet decoder that tolerates missing padding and non-zero
/// trailing bits, as the signing clients' encoders do.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Identity assertion produced by GameKit on the player's device.
///
/// Field names on the wire follow the names GameKit hands to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityToken {
    pub player_id: String,
    pub bundle_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Base64-encoded random salt.
    pub salt: String,
    /// Base64-encoded signature.
    pub signature: String,
    pub public_key_url: String,
}

impl IdentityToken {
    pub fn decoded_salt(&self) -> Result<Vec<u8>, VerifyError> {
        decode_field("salt", &self.salt)
    }

    pub fn decoded_signature(&self) -> Result<Vec<u8>, VerifyError> {
        decode_field("signature", &self.signature)
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, VerifyError> {
    if value.is_empty() {
        return Err(VerifyError::MalformedToken(format!("{name} is missing")));
    }
    LENIENT_BASE64.decode(value).map_err(|e| {
        tracing::debug!(?e, field = name, "token field is not base64");
        VerifyError::MalformedToken(format!("{name} is not valid base64"))
    })
}
