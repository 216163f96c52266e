// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership gate.
//!
//! Decides whether the authenticated principal owns the review, book or user
//! profile named by a path parameter. The decision is recomputed on every
//! request from current data and performs at most one repository read.
//! Resources that cannot be found are treated as not owned so the response
//! does not reveal whether they exist.

use super::{gate_lookup, AuthError, Principal};
use crate::state::AppState;
use crate::storage::{OwnedResource, StorageResult};

/// Kind of resource guarded by an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Owned by the reviewer
    Review,
    /// Owned by its author
    Book,
    /// A profile is owned by the user it describes
    User,
}

impl ResourceKind {
    /// Resolve the owning user id of resource `id`, or `None` if it doesn't exist.
    pub async fn resolve_owner(&self, state: &AppState, id: i64) -> StorageResult<Option<i64>> {
        match self {
            ResourceKind::Review => Ok(state
                .reviews
                .find_review_by_id(id)
                .await?
                .map(|review| review.owner_id())),
            ResourceKind::Book => Ok(state
                .books
                .find_book_by_id(id)
                .await?
                .map(|book| book.owner_id())),
            ResourceKind::User => Ok(Some(id)),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Review => write!(f, "review"),
            ResourceKind::Book => write!(f, "book"),
            ResourceKind::User => write!(f, "user"),
        }
    }
}

/// Ownership gate bound to one resource kind and the path parameter that
/// carries the resource id.
#[derive(Clone)]
pub struct OwnershipGate {
    state: AppState,
    kind: ResourceKind,
    id_param: &'static str,
}

impl OwnershipGate {
    pub fn new(state: AppState, kind: ResourceKind, id_param: &'static str) -> Self {
        Self {
            state,
            kind,
            id_param,
        }
    }

    /// Name of the path parameter holding the resource id.
    pub fn id_param(&self) -> &'static str {
        self.id_param
    }

    /// Authorize `principal` against the raw path value of the resource id.
    ///
    /// # Errors
    /// - `AuthError::InvalidResourceId` if `raw_id` is absent or not an integer
    /// - `AuthError::NotOwner` if the resource is missing or owned by someone else
    /// - `AuthError::Internal` if the lookup fails or times out
    pub async fn authorize(&self, principal: &Principal, raw_id: Option<&str>) -> Result<(), AuthError> {
        let resource_id: i64 = raw_id
            .and_then(|raw| raw.parse().ok())
            .ok_or(AuthError::InvalidResourceId)?;

        let owner = gate_lookup(
            self.state.gate_lookup_timeout,
            self.kind.resolve_owner(&self.state, resource_id),
        )
        .await?;

        if owner == Some(principal.id) {
            Ok(())
        } else {
            tracing::warn!(
                kind = %self.kind,
                resource_id,
                user_id = principal.id,
                found = owner.is_some(),
                "ownership denied"
            );
            Err(AuthError::NotOwner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;

    use crate::auth::{PasswordHasher, Role, TokenService};
    use crate::models::{NewBook, NewReview, NewUser, Review};
    use crate::storage::{ReviewRepository, StorageError};

    fn test_state() -> AppState {
        AppState::in_memory(TokenService::new("test-secret").unwrap(), PasswordHasher::new(4))
    }

    /// Review id 1 owned by user 1 on book 1 authored by user 1.
    async fn seeded_state() -> AppState {
        let state = test_state();
        let user = state
            .users
            .insert_user(NewUser {
                first_name: "John".into(),
                last_name: "Doe".into(),
                username: "johndoe".into(),
                email: "john@example.com".into(),
                password_hash: "$2b$04$unused".into(),
                genre: "Fiction".into(),
                description: None,
                role: Role::Writer,
            })
            .await
            .unwrap();
        let book = state
            .books
            .insert_book(
                NewBook {
                    title: "Dune".into(),
                    genre: "Science Fiction".into(),
                },
                user.id,
            )
            .await
            .unwrap();
        state
            .reviews
            .insert_review(
                book.id,
                user.id,
                NewReview {
                    rating: Some(5.0),
                    comment: None,
                },
            )
            .await
            .unwrap();
        state
    }

    struct FailingReviews;

    #[async_trait]
    impl ReviewRepository for FailingReviews {
        async fn find_review_by_id(&self, _id: i64) -> StorageResult<Option<Review>> {
            Err(StorageError::Backend("database unavailable".into()))
        }

        async fn insert_review(&self, _: i64, _: i64, _: NewReview) -> StorageResult<Review> {
            Err(StorageError::Backend("database unavailable".into()))
        }

        async fn delete_review(&self, _id: i64) -> StorageResult<()> {
            Err(StorageError::Backend("database unavailable".into()))
        }
    }

    struct HangingReviews;

    #[async_trait]
    impl ReviewRepository for HangingReviews {
        async fn find_review_by_id(&self, _id: i64) -> StorageResult<Option<Review>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn insert_review(&self, _: i64, _: i64, _: NewReview) -> StorageResult<Review> {
            Err(StorageError::Backend("unsupported".into()))
        }

        async fn delete_review(&self, _id: i64) -> StorageResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn review_owner_is_allowed() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Review, "review_id");
        let owner = Principal::new(1, Role::Reader);
        assert!(gate.authorize(&owner, Some("1")).await.is_ok());
    }

    #[tokio::test]
    async fn other_user_is_denied_review() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Review, "review_id");
        let stranger = Principal::new(999, Role::Reader);
        let err = gate.authorize(&stranger, Some("1")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotOwner));
        assert_eq!(err.to_string(), "You do not have permission to perform this action");
    }

    #[tokio::test]
    async fn missing_review_is_denied_not_found() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Review, "review_id");
        let owner = Principal::new(1, Role::Reader);
        assert!(matches!(
            gate.authorize(&owner, Some("77")).await,
            Err(AuthError::NotOwner)
        ));
    }

    #[tokio::test]
    async fn non_numeric_id_is_invalid() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Review, "review_id");
        let owner = Principal::new(1, Role::Reader);
        assert!(matches!(
            gate.authorize(&owner, Some("abc")).await,
            Err(AuthError::InvalidResourceId)
        ));
        assert!(matches!(
            gate.authorize(&owner, None).await,
            Err(AuthError::InvalidResourceId)
        ));
    }

    #[tokio::test]
    async fn padded_id_is_invalid() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Review, "review_id");
        let owner = Principal::new(1, Role::Reader);
        for raw in [" 1", "1 ", "+1x", ""] {
            assert!(
                matches!(gate.authorize(&owner, Some(raw)).await, Err(AuthError::InvalidResourceId)),
                "id: {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn book_ownership_follows_author() {
        let gate = OwnershipGate::new(seeded_state().await, ResourceKind::Book, "book_id");
        assert!(gate.authorize(&Principal::new(1, Role::Writer), Some("1")).await.is_ok());
        assert!(matches!(
            gate.authorize(&Principal::new(2, Role::Writer), Some("1")).await,
            Err(AuthError::NotOwner)
        ));
    }

    #[tokio::test]
    async fn user_ownership_compares_ids_directly() {
        let gate = OwnershipGate::new(test_state(), ResourceKind::User, "user_id");
        let principal = Principal::new(5, Role::Reader);
        assert!(gate.authorize(&principal, Some("5")).await.is_ok());
        assert!(matches!(
            gate.authorize(&principal, Some("6")).await,
            Err(AuthError::NotOwner)
        ));
    }

    #[tokio::test]
    async fn lookup_failure_is_internal() {
        let state = test_state().with_reviews(Arc::new(FailingReviews));
        let gate = OwnershipGate::new(state, ResourceKind::Review, "review_id");
        let err = gate
            .authorize(&Principal::new(1, Role::Reader), Some("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[tokio::test(start_paused = true)]
    async fn hung_lookup_times_out_as_internal() {
        let state = test_state()
            .with_reviews(Arc::new(HangingReviews))
            .with_gate_lookup_timeout(Duration::from_millis(100));
        let gate = OwnershipGate::new(state, ResourceKind::Review, "review_id");
        assert!(matches!(
            gate.authorize(&Principal::new(1, Role::Reader), Some("1")).await,
            Err(AuthError::Internal(_))
        ));
    }
}
