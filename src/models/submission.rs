// src/models/submission.rs

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Represents the 'submissions' table in the database.
/// One row per quiz attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub submitted_at: NaiveDateTime,
}

/// A submission joined with its author and quiz.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubmissionActivity {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total: i64,
    pub submitted_at: NaiveDateTime,
    pub username: String,
    pub quiz_title: String,
}

/// Aggregated struct for displaying the leaderboard.
#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub total_score: i64,
    pub attempts: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    /// Key: Question ID
    /// Value: the chosen option
    pub answers: HashMap<i64, String>,
}

const ACTIVITY_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.quiz_id, s.score, s.total, s.submitted_at,
           u.username, q.title AS quiz_title
    FROM submissions s
    JOIN users u ON s.user_id = u.id
    JOIN quizzes q ON s.quiz_id = q.id
"#;

impl Submission {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            "SELECT id, user_id, quiz_id, score, total, submitted_at FROM submissions ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of distinct (quiz, user) pairs that have at least one submission.
    pub async fn count_completed(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) AS completed FROM (SELECT DISTINCT quiz_id, user_id FROM submissions)",
        )
        .fetch_one(pool)
        .await
    }

    /// Newest submissions first, at most `limit` rows.
    pub async fn recent_activity(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<SubmissionActivity>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionActivity>(&format!(
            "{ACTIVITY_SELECT} ORDER BY s.submitted_at DESC, s.id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn all_activity(pool: &SqlitePool) -> Result<Vec<SubmissionActivity>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionActivity>(&format!(
            "{ACTIVITY_SELECT} ORDER BY s.submitted_at DESC, s.id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn activity_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<SubmissionActivity>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionActivity>(&format!(
            "{ACTIVITY_SELECT} WHERE s.user_id = ? ORDER BY s.submitted_at DESC, s.id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
