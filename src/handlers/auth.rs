// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{ApiJson, AppError},
    models::user::{LoginRequest, SignupRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new employee account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn signup(
    State(pool): State<SqlitePool>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, role)
        VALUES (?, ?, ?, 'employee')
        RETURNING id, username, email, password, role, created_at
        "#,
    )
    .bind(payload.username.trim())
    .bind(&email)
    .bind(hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            AppError::Conflict(format!("Email '{}' is already registered", email))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = user.id, "New employee registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// Authenticates a user and returns a JWT token plus the dashboard to open.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let user = User::find_by_email(&pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let role = user.role();
    let token = sign_jwt(
        user.id,
        &user.email,
        role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    let encoded_email: String = url::form_urlencoded::byte_serialize(user.email.as_bytes()).collect();
    let redirect = format!("{}?email={}", role.dashboard_path(), encoded_email);

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "type": "Bearer",
        "user": user,
        "redirect": redirect,
    })))
}
