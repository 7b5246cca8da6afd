// src/models/quiz.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::models::question::{CreateQuestionRequest, PublicQuestion};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Quiz {
    /// Every quiz row, oldest first.
    pub async fn all(pool: &SqlitePool) -> Result<Vec<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, created_by, created_at FROM quizzes ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, created_by, created_at FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Quiz listing entry for the API.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i64,
    pub created_at: NaiveDateTime,
}

/// A quiz with its questions, answers stripped.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<PublicQuestion>,
}

/// DTO for creating a quiz together with its questions.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "A quiz needs at least one question."), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// DTO for updating a quiz. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
