pub mod health;
pub mod identity;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1", identity::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        identity::verify_identity,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            health::HealthResponse,
            identity::VerifyIdentityRequest,
            identity::VerifyIdentityResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Identity", description = "Game Center identity verification"),
    )
)]
pub struct ApiDoc;
