// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login.
//!
//! Both flows validate first and only then touch the user directory. bcrypt
//! work runs on the blocking pool.

use std::sync::Arc;

use thiserror::Error;

use super::{PasswordHasher, Role, TokenService};
use crate::models::{LoginRequest, NewUser, RegisterRequest, User};
use crate::state::AppState;
use crate::storage::{StorageError, UserRepository};
use crate::validation::{validate_login, validate_register};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("Email already exists")]
    EmailTaken,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("registration failed: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("login failed: {0}")]
    Internal(String),
}

/// Credential workflows over the user directory.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.hasher, state.tokens.clone())
    }

    /// Register a new user.
    ///
    /// Email uniqueness is checked before username uniqueness.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, RegisterError> {
        let report = validate_register(&request);
        if !report.is_valid() {
            return Err(RegisterError::Validation(report.errors));
        }

        let email = request.email.unwrap_or_default().trim().to_string();
        let username = request.username.unwrap_or_default().trim().to_string();
        let password = request.password.unwrap_or_default();

        self.ensure_unique(&email, &username).await?;

        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RegisterError::Internal(e.to_string()))?
            .map_err(|e| RegisterError::Internal(e.to_string()))?;

        let new_user = NewUser {
            first_name: request.first_name.unwrap_or_default().trim().to_string(),
            last_name: request.last_name.unwrap_or_default().trim().to_string(),
            username: username.clone(),
            email: email.clone(),
            password_hash,
            genre: request.genre.unwrap_or_default().trim().to_string(),
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            role: request
                .role
                .as_deref()
                .and_then(Role::parse)
                .unwrap_or_default(),
        };

        match self.users.insert_user(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "user registered");
                Ok(user)
            }
            // Lost a race with a concurrent registration.
            Err(StorageError::AlreadyExists(_)) => {
                self.ensure_unique(&email, &username).await?;
                Err(RegisterError::EmailTaken)
            }
            Err(e) => Err(RegisterError::Internal(e.to_string())),
        }
    }

    async fn ensure_unique(&self, email: &str, username: &str) -> Result<(), RegisterError> {
        let by_email = self
            .users
            .find_user_by_email(email)
            .await
            .map_err(|e| RegisterError::Internal(e.to_string()))?;
        if by_email.is_some() {
            return Err(RegisterError::EmailTaken);
        }

        let by_username = self
            .users
            .find_user_by_username(username)
            .await
            .map_err(|e| RegisterError::Internal(e.to_string()))?;
        if by_username.is_some() {
            return Err(RegisterError::UsernameTaken);
        }

        Ok(())
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, request: LoginRequest) -> Result<String, LoginError> {
        let report = validate_login(&request);
        if !report.is_valid() {
            return Err(LoginError::Validation(report.errors));
        }

        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let Some(user) = self
            .users
            .find_user_by_email(email.trim())
            .await
            .map_err(|e| LoginError::Internal(e.to_string()))?
        else {
            return Err(LoginError::InvalidCredentials);
        };

        let hasher = self.hasher;
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| LoginError::Internal(e.to_string()))?;

        if !matches {
            tracing::info!(user_id = user.id, "login rejected: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| LoginError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::in_memory(TokenService::new("test-secret").unwrap(), PasswordHasher::new(4))
    }

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some("ValidPass1!".into()),
            genre: Some("Science Fiction".into()),
            description: Some("Test description".into()),
            role: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_defaults_role() {
        let state = test_state();
        let service = AuthService::from_state(&state);
        let user = service
            .register(registration("johndoe", "john@example.com"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.role, Role::Reader);
        assert_ne!(user.password_hash, "ValidPass1!");
        assert!(state.hasher.verify("ValidPass1!", &user.password_hash));
    }

    #[tokio::test]
    async fn register_accepts_writer_role() {
        let service = AuthService::from_state(&test_state());
        let mut request = registration("janedoe", "jane@example.com");
        request.role = Some("writer".into());
        let user = service.register(request).await.unwrap();
        assert_eq!(user.role, Role::Writer);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_before_username() {
        let service = AuthService::from_state(&test_state());
        service
            .register(registration("johndoe", "john@example.com"))
            .await
            .unwrap();

        let err = service
            .register(registration("johndoe", "john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::EmailTaken));
        assert_eq!(err.to_string(), "Email already exists");

        let err = service
            .register(registration("johndoe", "new@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::UsernameTaken));
    }

    #[tokio::test]
    async fn register_reports_validation_errors() {
        let service = AuthService::from_state(&test_state());
        let mut request = registration("johndoe", "john@example.com");
        request.genre = Some(String::new());
        match service.register(request).await {
            Err(RegisterError::Validation(errors)) => {
                assert_eq!(errors, vec!["Literary genre is required"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let state = test_state();
        let service = AuthService::from_state(&state);
        let user = service
            .register(registration("johndoe", "john@example.com"))
            .await
            .unwrap();

        let token = service
            .login(login("john@example.com", "ValidPass1!"))
            .await
            .unwrap();
        assert_eq!(state.tokens.verify(&token).unwrap().id, user.id);
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let service = AuthService::from_state(&test_state());
        service
            .register(registration("johndoe", "john@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            service.login(login("nobody@example.com", "ValidPass1!")).await,
            Err(LoginError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(login("john@example.com", "WrongPass1!")).await,
            Err(LoginError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn login_validates_before_lookup() {
        let service = AuthService::from_state(&test_state());
        match service.login(login("invalidemail", "short")).await {
            Err(LoginError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
