// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authenticated caller of a request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AuthError, Role};
use crate::models::User;

/// Authenticated identity resolved from a verified bearer token.
///
/// Only the authentication gate constructs one for a live request, and it
/// is rebuilt from the user directory on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// User id (token subject)
    pub id: i64,
    /// Role as currently stored for the user
    pub role: Role,
}

impl Principal {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Role gate.
    ///
    /// # Errors
    /// Returns `AuthError::RoleRequired` if the principal does not hold `required`.
    pub fn require_role(&self, required: Role) -> Result<(), AuthError> {
        if self.role == required {
            Ok(())
        } else {
            Err(AuthError::RoleRequired(required))
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}
