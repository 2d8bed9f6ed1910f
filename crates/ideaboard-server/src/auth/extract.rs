//! Extractors that attach the caller's identity to a handler.
//!
//! Identity travels with each request as an extractor value; there is no
//! ambient "current user".

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use ideaboard_shared::Identity;

use crate::api::AppState;
use crate::error::ServerError;
use crate::rate_limit::client_ip;

/// An authenticated caller. Missing token → 401, bad token → 403.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// The caller's identity if a valid token was sent. Invalid tokens are
/// treated as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

/// The requester's network address, used to key anonymous likes.
#[derive(Debug, Clone)]
pub struct ClientAddr(pub String);

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ServerError::Unauthenticated("Access token required".into()))?;
        let identity = state.tokens.verify(token)?;
        Ok(AuthUser(identity))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(state.tokens.optional_verify(bearer_token(&parts.headers))))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = client_ip(&parts.extensions, &parts.headers)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientAddr(addr))
    }
}
