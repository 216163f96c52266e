// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use crate::auth::{PasswordHasher, TokenService};
use crate::storage::{
    BookRepository, InMemoryStore, PostRepository, ReviewRepository, UserRepository,
};

/// Shared application state.
///
/// Repositories are trait objects so tests and alternative backends can be
/// injected without touching the gates or handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    /// Upper bound for each repository read performed by a gate.
    pub gate_lookup_timeout: Duration,
}

impl AppState {
    /// Build state backed by a single in-memory store.
    pub fn in_memory(tokens: TokenService, hasher: PasswordHasher) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            books: store.clone(),
            reviews: store.clone(),
            posts: store,
            tokens: Arc::new(tokens),
            hasher,
            gate_lookup_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_gate_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.gate_lookup_timeout = timeout;
        self
    }

    pub fn with_reviews(mut self, reviews: Arc<dyn ReviewRepository>) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn with_users(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = users;
        self
    }
}
