// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and the caller's own profile.

use axum::{extract::State, http::StatusCode, Json};

use super::{extract::ApiJson, users::apply_profile_update};
use crate::{
    auth::{Auth, AuthService},
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateProfileRequest,
        UserProfile,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation failed, or email/username already exists"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = AuthService::from_state(&state).register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Bearer token valid for one hour", body = LoginResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = AuthService::from_state(&state).login(request).await?;
    Ok(Json(LoginResponse { token }))
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn me(
    Auth(principal): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .users
        .find_user_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserProfile::from(&user)))
}

/// Update the authenticated caller's profile.
#[utoipa::path(
    post,
    path = "/auth/update",
    request_body = UpdateProfileRequest,
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn update_profile(
    Auth(principal): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = apply_profile_update(&state, principal.id, request).await?;
    Ok(Json(profile))
}
