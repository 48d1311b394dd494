//! Identity routes: Game Center signature verification.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use gamecenter_identity::IdentityToken;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiErrorBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/identity/verify", post(verify_identity))
}

// ---------------------------------------------------------------------------
// POST /api/v1/identity/verify
// ---------------------------------------------------------------------------

/// Identity fields exactly as GameKit hands them to the client.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyIdentityRequest {
    pub player_id: String,
    pub bundle_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Base64-encoded salt.
    pub salt: String,
    /// Base64-encoded signature.
    pub signature: String,
    pub public_key_url: String,
    /// Set to `false` to force a fresh certificate download.
    #[serde(default)]
    pub use_cache: Option<bool>,
}

impl VerifyIdentityRequest {
    fn into_token(self) -> (IdentityToken, Option<bool>) {
        let token = IdentityToken {
            player_id: self.player_id,
            bundle_id: self.bundle_id,
            timestamp: self.timestamp,
            salt: self.salt,
            signature: self.signature,
            public_key_url: self.public_key_url,
        };
        (token, self.use_cache)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyIdentityResponse {
    pub valid: bool,
    pub player_id: String,
    pub bundle_id: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/identity/verify",
    tag = "Identity",
    request_body = VerifyIdentityRequest,
    responses(
        (status = 200, description = "Verdict reached", body = VerifyIdentityResponse),
        (status = 400, description = "Untrusted certificate URL or undecodable token", body = ApiErrorBody),
        (status = 502, description = "Certificate could not be retrieved or parsed", body = ApiErrorBody),
    ),
)]
pub async fn verify_identity(
    State(state): State<AppState>,
    Json(body): Json<VerifyIdentityRequest>,
) -> Result<Json<VerifyIdentityResponse>, ApiError> {
    let (token, use_cache) = body.into_token();
    let use_cache = state.config.cert_cache_enabled && use_cache.unwrap_or(true);

    let valid = state.verifier.verify_with_cache(&token, use_cache).await?;

    tracing::info!(
        player_id = %token.player_id,
        bundle_id = %token.bundle_id,
        valid,
        "identity verified"
    );

    Ok(Json(VerifyIdentityResponse {
        valid,
        player_id: token.player_id,
        bundle_id: token.bundle_id,
    }))
}
