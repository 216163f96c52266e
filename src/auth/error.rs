// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Every gate rejection maps to exactly one variant. The response body is
//! always `{"message": "..."}`; internal details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::roles::Role;

/// Gate rejection.
#[derive(Debug)]
pub enum AuthError {
    /// No bearer token present, or the header is not `Bearer <token>`
    MissingToken,
    /// Token failed verification, or its subject no longer exists
    InvalidToken,
    /// A role/ownership gate ran without an authenticated principal
    NotAuthenticated,
    /// The principal lacks the required role
    RoleRequired(Role),
    /// The principal does not own the targeted resource
    NotOwner,
    /// The resource id path parameter is not an integer
    InvalidResourceId,
    /// A lookup inside the gate failed
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
}

impl AuthError {
    /// Get the error code for this error (used in logs).
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::RoleRequired(_) => "role_required",
            AuthError::NotOwner => "not_owner",
            AuthError::InvalidResourceId => "invalid_resource_id",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::RoleRequired(_) | AuthError::NotOwner => StatusCode::FORBIDDEN,
            AuthError::InvalidResourceId => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authentication token required"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::NotAuthenticated => write!(f, "User not authenticated"),
            AuthError::RoleRequired(role) => write!(f, "{} access required", role.label()),
            AuthError::NotOwner => {
                write!(f, "You do not have permission to perform this action")
            }
            AuthError::InvalidResourceId => write!(f, "Invalid resource ID"),
            // Detail stays in the logs.
            AuthError::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AuthError::Internal(detail) => {
                tracing::error!(error_code = self.error_code(), %detail, "auth gate failed");
            }
            _ => {
                tracing::warn!(error_code = self.error_code(), "request rejected by auth gate");
            }
        }
        let body = Json(AuthErrorBody {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
