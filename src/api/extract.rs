// Copyright 2026 Ampere Supply Engineering.

//! Bearer-token extraction against the auth collaborator

use crate::api::AppState;
use crate::auth::Identity;
use crate::errors::{DomainError, DomainResult};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Pull the bearer token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller's identity; `Unauthorized` without a valid token
pub async fn require_identity(state: &AppState, headers: &HeaderMap) -> DomainResult<Identity> {
    let token = bearer_token(headers)
        .ok_or_else(|| DomainError::Unauthorized("missing bearer token".to_string()))?;
    state.auth.authenticate(token).await
}

/// Resolve the caller's identity when a token is present
///
/// No token means an anonymous caller; a present but invalid token is
/// still rejected rather than silently downgraded.
pub async fn optional_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> DomainResult<Option<Identity>> {
    match bearer_token(headers) {
        None => Ok(None),
        Some(token) => state.auth.authenticate(token).await.map(Some),
    }
}

/// Resolve the caller and check the admin capability
pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> DomainResult<Identity> {
    let identity = require_identity(state, headers).await?;
    identity.require_admin()?;
    Ok(identity)
}
