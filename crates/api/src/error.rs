//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use untether_core::roundup::RoundupServiceError;
use untether_shared::AppError;

/// Message returned in place of internal error details.
const INTERNAL_MESSAGE: &str = "An error occurred";

/// Handler error rendered as `{"error": CODE, "message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RoundupServiceError> for ApiError {
    fn from(err: RoundupServiceError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
            INTERNAL_MESSAGE
        } else {
            self.0.message()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use untether_core::roundup::{RepositoryError, RoundupError};

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_keeps_message() {
        let (status, body) =
            render(RoundupServiceError::from(RoundupError::InvalidIncrement).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "custom rounding amount must be positive");
    }

    #[tokio::test]
    async fn test_storage_error_is_opaque() {
        let (status, body) = render(
            RoundupServiceError::from(RepositoryError::Unavailable("pool exhausted".into())).into(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }
}
