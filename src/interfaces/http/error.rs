//! Domain failure to HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::common::ApiResponse;
use crate::shared::DomainError;

/// Message surfaced for unclassified failures.
pub const SERVER_ERROR: &str = "Server Error";

/// Handler error. Wraps a `DomainError` and renders it as the standard
/// envelope with the matching status.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. }
            | DomainError::ValidationFailed(_)
            | DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Ownership failures are reported as 401, role failures as 403.
            DomainError::Unauthorized(_) | DomainError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            DomainError::RoleForbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            DomainError::NotFound { entity, .. } => {
                ApiResponse::<()>::error(format!("{} not found", entity))
            }
            DomainError::ValidationFailed(messages) => ApiResponse::errors(messages),
            DomainError::Conflict { field } => {
                ApiResponse::error(format!("{} already exists", field))
            }
            DomainError::BadRequest(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg)
            | DomainError::RoleForbidden(msg) => ApiResponse::error(msg),
            DomainError::Internal(detail) => {
                tracing::error!(error = %detail, "Unhandled server error");
                ApiResponse::error(SERVER_ERROR)
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    use super::*;

    async fn render(e: DomainError) -> (StatusCode, Value) {
        let resp = ApiError(e).into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn status_mapping() {
        let cases = [
            (DomainError::not_found("Post", "x"), StatusCode::NOT_FOUND),
            (DomainError::conflict("email"), StatusCode::BAD_REQUEST),
            (DomainError::BadRequest("q".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("t".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("o".into()), StatusCode::UNAUTHORIZED),
            (DomainError::RoleForbidden("r".into()), StatusCode::FORBIDDEN),
            (DomainError::Internal("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[tokio::test]
    async fn validation_lists_every_message() {
        let (status, body) = render(DomainError::ValidationFailed(vec![
            "Caption is required".into(),
            "Price is required".into(),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": ["Caption is required", "Price is required"]})
        );
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (_, body) = render(DomainError::Internal("Database error: disk I/O".into())).await;
        assert_eq!(body, json!({"success": false, "error": "Server Error"}));
    }

    #[tokio::test]
    async fn not_found_and_conflict_messages() {
        let (_, body) = render(DomainError::not_found("Post", "abc")).await;
        assert_eq!(body["error"], "Post not found");
        let (_, body) = render(DomainError::conflict("userName")).await;
        assert_eq!(body["error"], "userName already exists");
    }
}
