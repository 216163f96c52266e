// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! The gates are layered onto routes in pipeline order:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route(
//!         "/reviews/{review_id}",
//!         delete(reviews::delete_review).route_layer(from_fn_with_state(
//!             OwnershipGate::new(state.clone(), ResourceKind::Review, "review_id"),
//!             require_ownership,
//!         )),
//!     )
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```
//!
//! `authenticate` must wrap the role and ownership layers. If it does not,
//! those layers answer `401 User not authenticated`.

use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extractor::authenticate_headers, AuthError, OwnershipGate, Principal, Role};
use crate::state::AppState;

/// Principal attached by the authentication gate.
fn principal_of(request: &Request) -> Result<Principal, AuthError> {
    request
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or(AuthError::NotAuthenticated)
}

/// Authentication gate middleware: attaches a [`Principal`] or halts with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_headers(request.headers(), &state).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role gate middleware. The required role is the layer state.
pub async fn require_role(State(role): State<Role>, request: Request, next: Next) -> Response {
    match principal_of(&request).and_then(|principal| principal.require_role(role)) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Ownership gate middleware. Must be added with `route_layer` so the path
/// parameters are available.
pub async fn require_ownership(
    State(gate): State<OwnershipGate>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let principal = match principal_of(&request) {
        Ok(principal) => principal,
        Err(e) => return e.into_response(),
    };

    let raw_id = params
        .iter()
        .find(|(name, _)| *name == gate.id_param())
        .map(|(_, value)| value);

    match gate.authorize(&principal, raw_id).await {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
