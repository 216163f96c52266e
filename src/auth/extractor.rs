// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate and Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.id, principal.role
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{gate_lookup, AuthError, Principal, Role};
use crate::state::AppState;

/// Pull the bearer token out of the `Authorization` header.
///
/// A missing header, a non-`Bearer` scheme and an empty token are all
/// reported as `AuthError::MissingToken`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Authentication gate.
///
/// Extracts the bearer token, verifies it and resolves its subject to a live
/// user. A verified token whose user no longer exists is rejected exactly
/// like a forged one.
pub async fn authenticate_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| AuthError::InvalidToken)?;

    let user = gate_lookup(state.gate_lookup_timeout, state.users.find_user_by_id(claims.id))
        .await?
        .ok_or_else(|| {
            tracing::info!(user_id = claims.id, "token subject no longer exists");
            AuthError::InvalidToken
        })?;

    Ok(Principal::from(&user))
}

/// Extractor for authenticated users.
///
/// Reuses the principal attached by the `authenticate` middleware when the
/// route sits behind it, otherwise runs the authentication gate itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_review(
///     Auth(principal): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Review>, ApiError> {
///     // principal.id is the reviewer
/// }
/// ```
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the principal
        if let Some(principal) = parts.extensions.get::<Principal>().copied() {
            return Ok(Auth(principal));
        }

        let principal = authenticate_headers(&parts.headers, state).await?;
        parts.extensions.insert(principal);
        Ok(Auth(principal))
    }
}

/// Extractor that requires the writer role.
pub struct WriterOnly(pub Principal);

impl FromRequestParts<AppState> for WriterOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;
        principal.require_role(Role::Writer)?;
        Ok(WriterOnly(principal))
    }
}
