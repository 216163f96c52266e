// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! Public routes sit beside a protected router wrapped in the authentication
//! gate. Role and ownership gates are layered per route, inside it.

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, require_ownership, require_role},
        OwnershipGate, Principal, ResourceKind, Role,
    },
    models::{
        Book, CreatePostResponse, LoginRequest, LoginResponse, NewBook, NewPost, NewReview, Post,
        RegisterRequest, RegisterResponse, Review, UpdateBookRequest, UpdateProfileRequest,
        UserProfile,
    },
    state::AppState,
};

pub mod auth;
pub mod books;
pub mod extract;
pub mod health;
pub mod posts;
pub mod reviews;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/update", post(auth::update_profile))
        .route(
            "/users/{user_id}",
            put(users::update_user).route_layer(from_fn_with_state(
                OwnershipGate::new(state.clone(), ResourceKind::User, "user_id"),
                require_ownership,
            )),
        )
        .route("/books", post(books::create_book))
        .route(
            "/books/{book_id}",
            put(books::update_book)
                .delete(books::delete_book)
                .route_layer(from_fn_with_state(
                    OwnershipGate::new(state.clone(), ResourceKind::Book, "book_id"),
                    require_ownership,
                ))
                .route_layer(from_fn_with_state(Role::Writer, require_role)),
        )
        .route("/books/{book_id}/reviews", post(reviews::create_review))
        .route(
            "/reviews/{review_id}",
            delete(reviews::delete_review).route_layer(from_fn_with_state(
                OwnershipGate::new(state.clone(), ResourceKind::Review, "review_id"),
                require_ownership,
            )),
        )
        .route("/posts", post(posts::create_post))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy: a single allowed origin, or permissive when none is configured.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    match origin {
        None => Ok(CorsLayer::permissive()),
        Some(origin) => Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_str(origin)?))
            .allow_methods(Any)
            .allow_headers(Any)),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        users::update_user,
        books::create_book,
        books::update_book,
        books::delete_book,
        reviews::create_review,
        reviews::delete_review,
        posts::create_post
    ),
    components(
        schemas(
            health::HealthResponse,
            Principal,
            Role,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            UserProfile,
            Book,
            NewBook,
            UpdateBookRequest,
            Review,
            NewReview,
            Post,
            NewPost,
            CreatePostResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Registration, login and the caller's profile"),
        (name = "Users", description = "User profiles"),
        (name = "Books", description = "Books published by writers"),
        (name = "Reviews", description = "Book reviews"),
        (name = "Posts", description = "Posts published by any user")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
