// src/models/user.rs

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Unique, stored lowercased.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'admin' or 'employee'.
    pub role: String,

    pub created_at: NaiveDateTime,
}

impl User {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Employee)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    /// Landing page after login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Employee => "/employee/dashboard",
        }
    }

    /// Name shown on a dashboard when no email is supplied.
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin User",
            Role::Employee => "Employee User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The `user` object handed to dashboard views.
#[derive(Debug, Clone, Serialize)]
pub struct ViewUser {
    pub email: String,
    pub role: Role,
}

impl ViewUser {
    /// Uses the `email` query parameter when present and non-empty.
    pub fn from_query(email: Option<String>, role: Role) -> Self {
        let email = email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| role.placeholder_name().to_string());
        Self { email, role }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
