use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gamecenter_identity::VerifyError;
use serde::Serialize;
use utoipa::ToSchema;

/// Structured API error returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// Application-level error type that converts into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_gateway(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        let message = err.to_string();
        match err {
            VerifyError::InvalidSource(_) => Self::bad_request("INVALID_SOURCE", message),
            VerifyError::MalformedToken(_) => Self::bad_request("MALFORMED_TOKEN", message),
            VerifyError::SourceUnavailable(_) => {
                tracing::warn!(%message, "certificate host unavailable");
                Self::bad_gateway("SOURCE_UNAVAILABLE", message)
            }
            VerifyError::MalformedCertificate(_) => {
                tracing::warn!(%message, "certificate host served an unusable certificate");
                Self::bad_gateway("MALFORMED_CERTIFICATE", message)
            }
        }
    }
}
