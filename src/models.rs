// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Entities held by the storage layer and the request/response shapes used
//! by the REST API. Entities are plain structs; validation lives in
//! [`crate::validation`].
//!
//! ## Model Categories
//!
//! - **Users**: accounts, public profile projection, auth requests
//! - **Books**: books authored by writers
//! - **Reviews**: ratings left by users on books
//! - **Posts**: short posts published by any user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

// =============================================================================
// User Models
// =============================================================================

/// A registered user as stored.
///
/// Never serialize this type into a response; use [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub genre: String,
    pub description: Option<String>,
    pub role: Role,
}

/// Fields needed to insert a user; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub genre: String,
    pub description: Option<String>,
    pub role: Role,
}

/// Public projection of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Favourite literary genre
    pub genre: String,
    #[serde(default)]
    pub description: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            genre: user.genre.clone(),
            description: user.description.clone().unwrap_or_default(),
            role: user.role,
        }
    }
}

/// Request body for `POST /auth/register`.
///
/// Every field is optional at the wire level so that missing fields are
/// reported by the validator rather than rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Favourite literary genre
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `reader` (default) or `writer`
    #[serde(default)]
    pub role: Option<String>,
}

/// Response for a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token, valid for one hour
    pub token: String,
}

/// Partial profile update. Credentials and role cannot be changed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Book Models
// =============================================================================

/// A book published by a writer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub genre: String,
    /// User id of the writer who published the book
    pub author_id: i64,
}

/// Request body for `POST /books`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
}

/// Request body for `PUT /books/{book_id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

// =============================================================================
// Review Models
// =============================================================================

/// A user's review of a book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    /// User id of the reviewer
    pub user_id: i64,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Request body for `POST /books/{book_id}/reviews`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}

// =============================================================================
// Post Models
// =============================================================================

/// A short post with up to four images.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// User id of the author
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

/// Response for a successful `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostResponse {
    pub message: String,
    pub post: Post,
}
