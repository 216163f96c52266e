// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input validation for credentials and user-submitted content.
//!
//! Validators are pure functions over plain request structs. They never stop
//! at the first problem: every violated rule is collected into a
//! [`ValidationReport`], in a stable order, so the client can fix all of them
//! in one round trip.

use std::sync::LazyLock;

use regex::Regex;

use crate::auth::Role;
use crate::models::{
    LoginRequest, NewBook, NewPost, NewReview, RegisterRequest, UpdateProfileRequest,
};

pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_PASSWORD: &str = "Password must be at least 8 characters long, contain uppercase and lowercase letters, numbers, and special characters";

const NAME_MAX: usize = 50;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const GENRE_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;
const BOOK_TITLE_MAX: usize = 255;
const BOOK_GENRE_MAX: usize = 100;
const REVIEW_COMMENT_MAX: usize = 1000;
const POST_TITLE_MAX: usize = 100;
const POST_CONTENT_MAX: usize = 2000;
const POST_IMAGES_MAX: usize = 4;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username regex compiles"));

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 characters with a lowercase letter, an uppercase letter, a
/// digit and a special character (underscore or any non-word character).
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c == '_' || !c.is_ascii_alphanumeric())
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validate login input.
pub fn validate_login(request: &LoginRequest) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_email_format(&mut report, request.email.as_deref());
    check_password_format(&mut report, request.password.as_deref());
    report
}

/// Validate registration input.
///
/// Field checks run in declaration order, followed by the email and then the
/// password format checks.
pub fn validate_register(request: &RegisterRequest) -> ValidationReport {
    let mut report = ValidationReport::default();

    match present(&request.first_name) {
        None => report.push("First name is required"),
        Some(name) if char_len(name) > NAME_MAX => {
            report.push("First name must be at most 50 characters")
        }
        Some(_) => {}
    }

    match present(&request.last_name) {
        None => report.push("Last name is required"),
        Some(name) if char_len(name) > NAME_MAX => {
            report.push("Last name must be at most 50 characters")
        }
        Some(_) => {}
    }

    if let Some(username) = present(&request.username) {
        let len = char_len(username);
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            report.push("Username must be between 3 and 30 characters");
        }
        if !USERNAME_RE.is_match(username) {
            report.push("Username can only contain letters, numbers, underscores and hyphens");
        }
    } else {
        report.push("Username is required");
    }

    if present(&request.email).is_none() {
        report.push("Email is required");
    }

    if request.password.as_deref().map_or(true, str::is_empty) {
        report.push("Password is required");
    }

    match present(&request.genre) {
        None => report.push("Literary genre is required"),
        Some(genre) if char_len(genre) > GENRE_MAX => {
            report.push("Literary genre must be between 1 and 50 characters")
        }
        Some(_) => {}
    }

    if let Some(role) = present(&request.role) {
        if Role::parse(role).is_none() {
            report.push("Role must be either reader or writer");
        }
    }

    check_email_format(&mut report, request.email.as_deref());
    check_password_format(&mut report, request.password.as_deref());
    report
}

/// Validate a partial profile update. Absent fields are left unchanged.
pub fn validate_profile_update(update: &UpdateProfileRequest) -> ValidationReport {
    let mut report = ValidationReport::default();

    let checks = [
        (&update.first_name, "First name", NAME_MAX),
        (&update.last_name, "Last name", NAME_MAX),
        (&update.genre, "Literary genre", GENRE_MAX),
    ];
    for (field, label, max) in checks {
        let Some(value) = field else { continue };
        if value.trim().is_empty() {
            report.push(format!("{label} cannot be empty"));
        } else if char_len(value.trim()) > max {
            report.push(format!("{label} must be at most {max} characters"));
        }
    }

    report
}

/// Validate a new book.
pub fn validate_book(book: &NewBook) -> ValidationReport {
    let mut report = ValidationReport::default();

    let title = book.title.trim();
    if title.is_empty() {
        report.push("Title is required");
    } else if char_len(&book.title) > BOOK_TITLE_MAX {
        report.push("Title must be between 1 and 255 characters");
    }

    let genre = book.genre.trim();
    if genre.is_empty() {
        report.push("Genre is required");
    } else if char_len(&book.genre) > BOOK_GENRE_MAX {
        report.push("Genre must be between 1 and 100 characters");
    }

    report
}

/// Validate a new review.
pub fn validate_review(review: &NewReview) -> ValidationReport {
    let mut report = ValidationReport::default();

    match review.rating {
        None => report.push("Rating is required"),
        Some(rating) if !rating.is_finite() => report.push("Rating must be a number"),
        Some(rating) if rating < 0.0 => report.push("Rating must be at least 0"),
        Some(rating) if rating > 5.0 => report.push("Rating must be at most 5"),
        Some(_) => {}
    }

    if let Some(comment) = &review.comment {
        if char_len(comment) > REVIEW_COMMENT_MAX {
            report.push("Comment must be shorter than 1000 characters");
        }
    }

    report
}

/// Validate a new post. Only the content is required.
pub fn validate_post(post: &NewPost) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(title) = &post.title {
        if char_len(title) > POST_TITLE_MAX {
            report.push("Title must be at most 100 characters");
        }
    }

    match present(&post.content) {
        None => report.push("Content is required"),
        Some(_) if post.content.as_deref().map_or(0, char_len) > POST_CONTENT_MAX => {
            report.push("Content must be at most 2000 characters")
        }
        Some(_) => {}
    }

    if post.image_urls.as_ref().map_or(0, Vec::len) > POST_IMAGES_MAX {
        report.push("A post can have at most 4 images");
    }

    report
}

fn check_email_format(report: &mut ValidationReport, email: Option<&str>) {
    if !is_valid_email(email.unwrap_or_default()) {
        report.push(INVALID_EMAIL);
    }
}

fn check_password_format(report: &mut ValidationReport, password: Option<&str>) {
    if !is_valid_password(password.unwrap_or_default()) {
        report.push(INVALID_PASSWORD);
    }
}
