// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::ApiJson,
    auth::Auth,
    error::ApiError,
    models::{CreatePostResponse, NewPost},
    state::AppState,
    validation::validate_post,
};

/// Publish a post as the authenticated caller.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = NewPost,
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 201, body = CreatePostResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn create_post(
    Auth(principal): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewPost>,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let report = validate_post(&request);
    if !report.is_valid() {
        return Err(ApiError::validation(report.errors));
    }

    let post = state.posts.insert_post(request, principal.id).await?;
    tracing::info!(post_id = post.id, author_id = principal.id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}
