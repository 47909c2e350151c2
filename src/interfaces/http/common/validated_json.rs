//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value. Failures
//! come back as the standard error envelope with status 400; validation
//! failures list every offending field.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::interfaces::http::error::ApiError;
use crate::shared::DomainError;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CommentRequest {
///     #[validate(length(max = 500))]
///     text: String,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CommentRequest>) {}
/// ```
pub struct ValidatedJson<T>(pub T);

fn rejection(e: JsonRejection) -> ApiError {
    ApiError(DomainError::BadRequest(format!("Invalid JSON: {}", e.body_text())))
}

/// Flatten field errors into `"field: message"` lines, sorted by field so
/// the output is stable.
fn violations(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect()
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection)?;

        value
            .validate()
            .map_err(|e| ApiError(DomainError::ValidationFailed(violations(&e))))?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(max = 10, message = "Caption cannot exceed 10 characters"))]
        caption: String,
        #[validate(range(min = 0.0, message = "Price must be zero or greater"))]
        price: f64,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<TestBody>) -> &'static str {
        "ok"
    }

    async fn send(body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/test", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let body = serde_json::json!({"caption": "Lamp", "price": 3.5});
        let (status, _) = send(serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let (status, body) = send("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn every_violation_is_reported() {
        let body = serde_json::json!({"caption": "far too long caption", "price": -1.0});
        let (status, body) = send(serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            serde_json::json!([
                "Caption cannot exceed 10 characters",
                "Price must be zero or greater"
            ])
        );
    }
}
