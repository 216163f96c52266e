// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential handling, bearer tokens and the request gates.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email + password and receives a one hour JWT
//! 2. Client sends `Authorization: Bearer <token>` on protected routes
//! 3. Gates run in order:
//!    - **Authentication**: verify token, resolve the user, attach a [`Principal`]
//!    - **Role** (optional): require a [`Role`]
//!    - **Ownership** (optional): require that the principal owns the
//!      review, book or profile named in the path
//!
//! ## Security
//!
//! - Expired, tampered and orphaned tokens all answer `401 Invalid token`
//! - Ownership lookups that find nothing answer `403`, never `404`
//! - Every gate lookup is bounded by the configured timeout

use std::{future::Future, time::Duration};

pub mod error;
pub mod extractor;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod principal;
pub mod roles;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use extractor::{Auth, WriterOnly};
pub use ownership::{OwnershipGate, ResourceKind};
pub use password::PasswordHasher;
pub use principal::Principal;
pub use roles::Role;
pub use service::{AuthService, LoginError, RegisterError};
pub use token::{TokenError, TokenService};

use crate::storage::StorageResult;

/// Run a repository read on behalf of a gate.
///
/// Backend failures and timeouts both become `AuthError::Internal`.
pub(crate) async fn gate_lookup<T, F>(timeout: Duration, lookup: F) -> Result<T, AuthError>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AuthError::Internal(e.to_string())),
        Err(_) => Err(AuthError::Internal(format!(
            "lookup exceeded {}ms",
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[tokio::test]
    async fn gate_lookup_passes_values_through() {
        let value = gate_lookup(Duration::from_secs(1), async { Ok::<_, StorageError>(Some(3)) })
            .await
            .unwrap();
        assert_eq!(value, Some(3));
    }

    #[tokio::test]
    async fn gate_lookup_maps_failures_to_internal() {
        let result: Result<Option<i64>, _> = gate_lookup(Duration::from_secs(1), async {
            Err(StorageError::Backend("down".into()))
        })
        .await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn gate_lookup_times_out() {
        let result: Result<Option<i64>, _> = gate_lookup(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(None)
        })
        .await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
