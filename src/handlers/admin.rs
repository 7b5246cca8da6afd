// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::{ApiJson, AppError},
    models::{
        quiz::{CreateQuizRequest, UpdateQuizRequest},
        submission::Submission,
        user::User,
    },
    utils::{html::clean_text, jwt::Claims},
};

/// Creates a quiz and its questions in one transaction.
/// Admin only.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(pos) = payload.questions.iter().position(|q| !q.answer_is_an_option()) {
        return Err(AppError::BadRequest(format!(
            "Question {}: answer must be one of the options",
            pos + 1
        )));
    }

    let creator_id = claims.user_id()?;
    let description = payload
        .description
        .as_deref()
        .map(clean_text)
        .filter(|d| !d.is_empty());

    let mut tx = pool.begin().await?;

    let quiz_id: i64 = sqlx::query_scalar(
        "INSERT INTO quizzes (title, description, created_by) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(clean_text(&payload.title))
    .bind(description)
    .bind(creator_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    for (idx, question) in payload.questions.iter().enumerate() {
        // Options are compared verbatim at scoring time; only the prompt is sanitized.
        let options = sqlx::types::Json(question.options.clone());
        sqlx::query(
            "INSERT INTO questions (quiz_id, position, content, options, answer) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(quiz_id)
        .bind(idx as i64 + 1)
        .bind(clean_text(&question.content))
        .bind(options)
        .bind(&question.answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(quiz_id, questions = payload.questions.len(), "Quiz created");

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": quiz_id }))))
}

/// Updates a quiz's title and/or description.
/// Admin only.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.title.is_none() && payload.description.is_none() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE quizzes SET ");
    let mut fields = builder.separated(", ");
    if let Some(title) = &payload.title {
        fields.push("title = ");
        fields.push_bind_unseparated(clean_text(title));
    }
    if let Some(description) = &payload.description {
        fields.push("description = ");
        fields.push_bind_unseparated(clean_text(description));
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update quiz: {:?}", e);
        AppError::from(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a quiz; its questions and submissions go with it.
/// Admin only.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete quiz: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = User::all(&pool).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(users))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.user_id()? {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Every submission with author and quiz title, newest first.
/// Admin only.
pub async fn list_submissions(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let rows = Submission::all_activity(&pool).await?;
    Ok(Json(rows))
}
