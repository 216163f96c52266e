// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership relation between stored resources and users.

use crate::models::{Book, Review};

/// Trait for resources that have an owning user.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_id(&self) -> i64;
}

impl OwnedResource for Review {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl OwnedResource for Book {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_owner_is_reviewer() {
        let review = Review {
            id: 1,
            book_id: 1,
            user_id: 9,
            rating: 4.0,
            comment: None,
        };
        assert_eq!(review.owner_id(), 9);
    }

    #[test]
    fn book_owner_is_author() {
        let book = Book {
            id: 3,
            title: "Dune".into(),
            genre: "Science Fiction".into(),
            author_id: 5,
        };
        assert_eq!(book.owner_id(), 5);
    }
}
