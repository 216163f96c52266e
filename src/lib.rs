// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bookshelf - Book Social Platform API
//!
//! Users register as readers or writers, writers publish books and anyone
//! signed in can review them. Mutations are guarded by a bearer token gate,
//! a role gate and a per-resource ownership gate.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Passwords, tokens and the request gates
//! - `config` - Environment configuration
//! - `storage` - Repository contracts and the in-memory store
//! - `validation` - Credential and content validation

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod validation;
