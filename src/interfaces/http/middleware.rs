//! Authentication middleware for Axum
//!
//! The credential travels in a cookie (`token` by default). An
//! `Authorization: Bearer` header is accepted when the cookie is absent.
//! On success the resolved `Identity` is placed in request extensions.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::application::AuthGate;

/// Authentication state shared by protected routes
#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AuthGate>,
    pub cookie_name: Arc<str>,
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Cookie first, then bearer header. Empty values count as absent.
pub fn extract_credential<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    cookie_value(headers, cookie_name)
        .filter(|v| !v.is_empty())
        .or_else(|| bearer_token(headers).filter(|v| !v.is_empty()))
}

/// Rejects the request unless it carries a credential for a live user.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let credential = extract_credential(request.headers(), &auth.cookie_name).map(String::from);

    match auth.gate.authenticate(credential.as_deref()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}
