// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Repository contracts consumed by the auth core and the API handlers, and
//! the in-memory implementation used by the server binary and tests.
//!
//! ## Contract
//!
//! - Lookups return `Ok(None)` for "not found"; `Err` is reserved for
//!   backend failures.
//! - Email and username are unique across users; inserts that would break
//!   this return `StorageError::AlreadyExists`.
//! - Repositories are injected into [`crate::state::AppState`] as trait
//!   objects so tests can substitute their own.

pub mod memory;
pub mod ownership;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Book, NewBook, NewPost, NewReview, NewUser, Post, Review, User};

pub use memory::InMemoryStore;
pub use ownership::OwnedResource;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// User directory.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> StorageResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Insert a user and return it with its assigned id.
    async fn insert_user(&self, user: NewUser) -> StorageResult<User>;

    /// Replace a stored user.
    async fn update_user(&self, user: User) -> StorageResult<User>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Look up a book; `author_id` is always populated.
    async fn find_book_by_id(&self, id: i64) -> StorageResult<Option<Book>>;

    async fn insert_book(&self, book: NewBook, author_id: i64) -> StorageResult<Book>;

    /// Replace a stored book. The author cannot change.
    async fn update_book(&self, book: Book) -> StorageResult<Book>;

    /// Delete a book and the reviews attached to it.
    async fn delete_book(&self, id: i64) -> StorageResult<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Look up a review; `user_id` (the owner) is always populated.
    async fn find_review_by_id(&self, id: i64) -> StorageResult<Option<Review>>;

    async fn insert_review(
        &self,
        book_id: i64,
        user_id: i64,
        review: NewReview,
    ) -> StorageResult<Review>;

    async fn delete_review(&self, id: i64) -> StorageResult<()>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post authored by `author_id`; timestamps are set by storage.
    async fn insert_post(&self, post: NewPost, author_id: i64) -> StorageResult<Post>;
}
