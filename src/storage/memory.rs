// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store backing all repositories.
//!
//! Data lives for the lifetime of the process. Ids are assigned
//! sequentially per table starting at 1.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    BookRepository, PostRepository, ReviewRepository, StorageError, StorageResult,
    UserRepository,
};
use crate::models::{Book, NewBook, NewPost, NewReview, NewUser, Post, Review, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    books: BTreeMap<i64, Book>,
    reviews: BTreeMap<i64, Review>,
    posts: BTreeMap<i64, Post>,
    next_user_id: i64,
    next_book_id: i64,
    next_review_id: i64,
    next_post_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::AlreadyExists(format!("User with email {}", user.email)));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::AlreadyExists(format!(
                "User with username {}",
                user.username
            )));
        }

        let id = next_id(&mut tables.next_user_id);
        let stored = User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            genre: user.genre,
            description: user.description,
            role: user.role,
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_user(&self, user: User) -> StorageResult<User> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.users.get_mut(&user.id) else {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        };
        *slot = user.clone();
        Ok(user)
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn find_book_by_id(&self, id: i64) -> StorageResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn insert_book(&self, book: NewBook, author_id: i64) -> StorageResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&author_id) {
            return Err(StorageError::NotFound(format!("User {author_id}")));
        }

        let id = next_id(&mut tables.next_book_id);
        let stored = Book {
            id,
            title: book.title.trim().to_string(),
            genre: book.genre.trim().to_string(),
            author_id,
        };
        tables.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_book(&self, book: Book) -> StorageResult<Book> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.books.get_mut(&book.id) else {
            return Err(StorageError::NotFound(format!("Book {}", book.id)));
        };
        let updated = Book {
            title: book.title.trim().to_string(),
            genre: book.genre.trim().to_string(),
            author_id: slot.author_id,
            ..book
        };
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_book(&self, id: i64) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if tables.books.remove(&id).is_none() {
            return Err(StorageError::NotFound(format!("Book {id}")));
        }
        tables.reviews.retain(|_, review| review.book_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_review_by_id(&self, id: i64) -> StorageResult<Option<Review>> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn insert_review(
        &self,
        book_id: i64,
        user_id: i64,
        review: NewReview,
    ) -> StorageResult<Review> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&book_id) {
            return Err(StorageError::NotFound(format!("Book {book_id}")));
        }

        let id = next_id(&mut tables.next_review_id);
        let stored = Review {
            id,
            book_id,
            user_id,
            rating: review.rating.unwrap_or_default(),
            comment: review.comment,
        };
        tables.reviews.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_review(&self, id: i64) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if tables.reviews.remove(&id).is_some() {
            Ok(())
        } else {
            Err(StorageError::NotFound(format!("Review {id}")))
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert_post(&self, post: NewPost, author_id: i64) -> StorageResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&author_id) {
            return Err(StorageError::NotFound(format!("User {author_id}")));
        }

        let id = next_id(&mut tables.next_post_id);
        let now = Utc::now();
        let stored = Post {
            id,
            title: post
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            content: post.content.unwrap_or_default().trim().to_string(),
            image_urls: post.image_urls.unwrap_or_default(),
            author_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(id, stored.clone());
        Ok(stored)
    }
}
