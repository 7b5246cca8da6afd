// src/handlers/pages.rs

//! Server-rendered admin and employee pages.
//!
//! None of these routes are gated; they trust the `email` query parameter
//! purely for display.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        quiz::Quiz,
        submission::{Submission, SubmissionActivity},
        user::{Role, User, ViewUser},
    },
    views::SharedViews,
};

const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Reads `email` from the raw query string. The first occurrence wins and
/// anything unparseable is ignored, so a page never rejects its query.
fn email_param(query: Option<String>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "email")
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardData {
    user: ViewUser,
    total_quizzes: usize,
    total_users: usize,
    total_results: usize,
    completed_quizzes: i64,
    recent_activity: Vec<SubmissionActivity>,
    quizzes: Vec<Quiz>,
}

fn render(views: &SharedViews, view: &str, data: Value) -> Result<Html<String>, AppError> {
    views.render(view, data).map(Html)
}

/// Views that take no data.
pub fn render_static(views: &SharedViews, view: &str) -> Result<Html<String>, AppError> {
    render(views, view, json!({}))
}

/// Admin dashboard: five independent reads, all of which must succeed.
pub async fn admin_dashboard(
    State(pool): State<SqlitePool>,
    State(views): State<SharedViews>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let user = ViewUser::from_query(email_param(query), Role::Admin);

    let (quizzes, users, submissions, completed, recent) = tokio::try_join!(
        Quiz::all(&pool),
        User::all(&pool),
        Submission::all(&pool),
        Submission::count_completed(&pool),
        Submission::recent_activity(&pool, RECENT_ACTIVITY_LIMIT),
    )?;

    let data = DashboardData {
        user,
        total_quizzes: quizzes.len(),
        total_users: users.len(),
        total_results: submissions.len(),
        completed_quizzes: completed,
        recent_activity: recent,
        quizzes,
    };

    let data = serde_json::to_value(data).map_err(|e| AppError::InternalServerError(e.to_string()))?;
    render(&views, "admin/dashboard", data)
}

pub async fn admin_manage_quiz(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "admin/manageQuiz")
}

pub async fn admin_submissions(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "admin/submissions")
}

pub async fn admin_leaderboard(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "admin/leaderboard")
}

pub async fn admin_profile(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "admin/profile")
}

pub async fn employee_dashboard(
    State(views): State<SharedViews>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let user = ViewUser::from_query(email_param(query), Role::Employee);
    render(&views, "employee/empdashboard", json!({ "user": user }))
}

/// The only page that answers its own query failure: plain-text 500.
pub async fn available_quizzes(
    State(pool): State<SqlitePool>,
    State(views): State<SharedViews>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let quizzes = match Quiz::all(&pool).await {
        Ok(quizzes) => quizzes,
        Err(e) => {
            tracing::error!("Error fetching quizzes: {:?}", e);
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error loading available quizzes",
            )
                .into_response());
        }
    };
    tracing::debug!("Available quizzes: {}", quizzes.len());

    let user = ViewUser::from_query(email_param(query), Role::Employee);
    let page = render(
        &views,
        "employee/availableQuizzes",
        json!({ "user": user, "quizzes": quizzes }),
    )?;

    Ok(page.into_response())
}

pub async fn employee_submissions(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "employee/mysubmissions")
}

pub async fn employee_leaderboard(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "employee/leaderboard")
}

pub async fn employee_profile(State(views): State<SharedViews>) -> Result<Html<String>, AppError> {
    render_static(&views, "employee/profile")
}

/// The quiz id is passed to the view as given, without parsing or lookup.
pub async fn attempt_quiz(
    State(views): State<SharedViews>,
    Path(quiz_id): Path<String>,
) -> Result<Html<String>, AppError> {
    render(&views, "employee/attemptQuiz", json!({ "quizId": quiz_id }))
}
