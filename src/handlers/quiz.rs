// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::{ApiJson, AppError},
    models::{
        question::Question,
        quiz::{Quiz, QuizDetail, QuizSummary},
        submission::{LeaderboardEntry, Submission, SubmitQuizRequest},
    },
    utils::jwt::Claims,
};

const LEADERBOARD_SIZE: i64 = 10;

/// Helper struct for fetching answer keys from the database.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    answer: String,
}

/// Lists all quizzes with their question counts.
pub async fn list_quizzes(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT
            q.id, q.title, q.description, q.created_at,
            (SELECT COUNT(*) FROM questions WHERE quiz_id = q.id) AS question_count
        FROM quizzes q
        ORDER BY q.id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list quizzes: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(quizzes))
}

/// Returns one quiz with its questions. Answers are never included.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = Quiz::find(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, position, content, options, answer
        FROM questions
        WHERE quiz_id = ?
        ORDER BY position, id
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(QuizDetail {
        quiz,
        questions: questions.into_iter().map(Into::into).collect(),
    }))
}

/// Scores a quiz attempt and records it.
///
/// * One point per answer that matches the stored option exactly (after trimming).
/// * Unknown question ids are ignored.
/// * `total` is the number of questions in the quiz, answered or not.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    ApiJson(req): ApiJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let user_id = claims.user_id()?;

    if Quiz::find(&pool, quiz_id).await?.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let keys: Vec<AnswerKey> = sqlx::query_as("SELECT id, answer FROM questions WHERE quiz_id = ?")
        .bind(quiz_id)
        .fetch_all(&pool)
        .await?;

    let total = keys.len() as i64;
    let key_map: HashMap<i64, String> = keys.into_iter().map(|k| (k.id, k.answer)).collect();
    let score = score_answers(&key_map, &req.answers);

    let submission = sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions (user_id, quiz_id, score, total)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, quiz_id, score, total, submitted_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(total)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store submission: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(user_id, quiz_id, score, total, "Quiz submitted");

    Ok(Json(serde_json::json!({
        "submission_id": submission.id,
        "score": score,
        "total": total,
        "submitted_at": submission.submitted_at,
        "message": "Quiz submitted successfully"
    })))
}

fn score_answers(key: &HashMap<i64, String>, answers: &HashMap<i64, String>) -> i64 {
    answers
        .iter()
        .filter(|(q_id, given)| key.get(q_id).is_some_and(|correct| given.trim() == correct))
        .count() as i64
}

/// The caller's own submissions, newest first.
pub async fn my_submissions(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let rows = Submission::activity_for_user(&pool, user_id).await?;
    Ok(Json(rows))
}

/// Top users by summed score across all their submissions.
pub async fn get_leaderboard(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let leaderboard = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            u.id AS user_id,
            u.username,
            SUM(s.score) AS total_score,
            COUNT(s.id) AS attempts
        FROM submissions s
        JOIN users u ON s.user_id = u.id
        GROUP BY u.id, u.username
        ORDER BY total_score DESC, attempts ASC, u.username ASC
        LIMIT ?
        "#,
    )
    .bind(LEADERBOARD_SIZE)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(leaderboard))
}
