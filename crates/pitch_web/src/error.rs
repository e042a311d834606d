use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pitch_core::Error;
use serde_json::json;

/// Maps pipeline failures onto HTTP responses.
///
/// Validation problems surface their message (and accepted values, when
/// there are any); embedding failures become a 502 since the provider is
/// upstream; anything else is reported without detail. The search service
/// has already logged the underlying error.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation { message, valid: Some(valid) } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message, "valid": valid }))).into_response()
            }
            Error::Validation { message, valid: None } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Error::Embedding(detail) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("Embedding failed: {}", detail) })),
            )
                .into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Search failed" }))).into_response(),
        }
    }
}
