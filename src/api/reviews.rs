// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::{ApiJson, ApiPath},
    auth::Auth,
    error::ApiError,
    models::{NewReview, Review},
    state::AppState,
    validation::validate_review,
};

/// Review a book as the authenticated caller.
#[utoipa::path(
    post,
    path = "/books/{book_id}/reviews",
    params(
        ("book_id" = i64, Path, description = "Identifier of the reviewed book")
    ),
    request_body = NewReview,
    tag = "Reviews",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Review),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn create_review(
    Auth(principal): Auth,
    ApiPath(book_id): ApiPath<i64>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let report = validate_review(&request);
    if !report.is_valid() {
        return Err(ApiError::validation(report.errors));
    }

    if state.books.find_book_by_id(book_id).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    let review = state
        .reviews
        .insert_review(book_id, principal.id, request)
        .await?;
    tracing::info!(review_id = review.id, book_id, user_id = principal.id, "review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// Delete a review. Only its author may do this.
#[utoipa::path(
    delete,
    path = "/reviews/{review_id}",
    params(
        ("review_id" = i64, Path, description = "Identifier of the review to delete")
    ),
    tag = "Reviews",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the author of the review"),
    )
)]
pub async fn delete_review(
    ApiPath(review_id): ApiPath<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete_review(review_id).await?;
    tracing::info!(review_id, "review deleted");
    Ok(StatusCode::NO_CONTENT)
}
