// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile endpoints.

use axum::{extract::State, Json};

use crate::{
    api::extract::{ApiJson, ApiPath},
    auth::Auth,
    error::ApiError,
    models::{UpdateProfileRequest, UserProfile},
    state::AppState,
    validation::validate_profile_update,
};

/// Apply a partial profile update to user `user_id`.
///
/// Shared by `POST /auth/update` and `PUT /users/{user_id}`.
pub(crate) async fn apply_profile_update(
    state: &AppState,
    user_id: i64,
    request: UpdateProfileRequest,
) -> Result<UserProfile, ApiError> {
    let report = validate_profile_update(&request);
    if !report.is_valid() {
        return Err(ApiError::validation(report.errors));
    }

    let mut user = state
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(first_name) = request.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = request.last_name {
        user.last_name = last_name.trim().to_string();
    }
    if let Some(genre) = request.genre {
        user.genre = genre.trim().to_string();
    }
    if let Some(description) = request.description {
        let description = description.trim();
        user.description = (!description.is_empty()).then(|| description.to_string());
    }

    let user = state.users.update_user(user).await?;
    tracing::info!(user_id, "profile updated");
    Ok(UserProfile::from(&user))
}

/// Update a user's profile. Only the user themselves may do this.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Identifier of the user to update")
    ),
    request_body = UpdateProfileRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Validation failed or malformed id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not this user"),
    )
)]
pub async fn update_user(
    Auth(principal): Auth,
    ApiPath(user_id): ApiPath<i64>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    tracing::debug!(caller = principal.id, user_id, "updating profile");
    let profile = apply_profile_update(&state, user_id, request).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PasswordHasher, Principal, Role, TokenService};
    use crate::models::NewUser;
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        AppState::in_memory(TokenService::new("test-secret").unwrap(), PasswordHasher::new(4))
    }

    async fn seed_user(state: &AppState) -> i64 {
        state
            .users
            .insert_user(NewUser {
                first_name: "John".into(),
                last_name: "Doe".into(),
                username: "johndoe".into(),
                email: "john@example.com".into(),
                password_hash: "$2b$04$unused".into(),
                genre: "Fiction".into(),
                description: Some("Old bio".into()),
                role: Role::Reader,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let state = test_state();
        let id = seed_user(&state).await;

        let request = UpdateProfileRequest {
            first_name: Some("  Johnny ".into()),
            description: Some("   ".into()),
            ..Default::default()
        };
        let Json(profile) = update_user(
            Auth(Principal::new(id, Role::Reader)),
            ApiPath(id),
            State(state.clone()),
            ApiJson(request),
        )
        .await
        .expect("update succeeds");

        assert_eq!(profile.first_name, "Johnny");
        assert_eq!(profile.last_name, "Doe");
        assert_eq!(profile.description, "");

        let stored = state.users.find_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.description, None);
        assert_eq!(stored.genre, "Fiction");
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_before_lookup() {
        let state = test_state();
        let request = UpdateProfileRequest {
            genre: Some(String::new()),
            ..Default::default()
        };
        let err = apply_profile_update(&state, 42, request).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors, Some(vec!["Literary genre cannot be empty".to_string()]));
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let err = apply_profile_update(&test_state(), 42, UpdateProfileRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
