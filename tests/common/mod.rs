// tests/common/mod.rs
#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, time::Duration};

use quiz_portal::{
    config::{Config, Deployment},
    db,
    error::AppError,
    routes,
    state::AppState,
    utils::hash::hash_password,
    views::{SharedViews, TeraViews, ViewRenderer},
};
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// GETs a page rendered by `RecordingViews` and returns `{view, data}`.
    pub async fn page(&self, path: &str) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200, "GET {} failed", path);
        let body = response.text().await.unwrap();
        serde_json::from_str(&body).expect("Page body is not a recorded view")
    }

    /// Logs in through the API and returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");
        body["token"].as_str().expect("Token not found").to_string()
    }
}

/// Renders a view as `{"view": name, "data": payload}` so tests can inspect what a page passed.
pub struct RecordingViews;

impl ViewRenderer for RecordingViews {
    fn render(&self, view: &str, data: Value) -> Result<String, AppError> {
        Ok(json!({ "view": view, "data": data }).to_string())
    }
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        deployment: Deployment::Local,
        public_dir: manifest_dir().join("public"),
        views_dir: manifest_dir().join("templates"),
        admin_username: "admin".to_string(),
        admin_email: None,
        admin_password: None,
    }
}

/// Spawns the app with the recording renderer.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(RecordingViews)).await
}

/// Spawns the app with the real Tera templates.
pub async fn spawn_app_with_templates() -> TestApp {
    let views = TeraViews::from_dir(&manifest_dir().join("templates")).expect("Templates must load");
    spawn_app_with(Arc::new(views)).await
}

async fn spawn_app_with(views: SharedViews) -> TestApp {
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    db::migrate(&pool).await.expect("Failed to migrate database");

    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
        views,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

pub async fn insert_user(pool: &SqlitePool, username: &str, email: &str, password: &str, role: &str) -> i64 {
    let hashed = hash_password(password).unwrap();
    sqlx::query_scalar("INSERT INTO users (username, email, password, role) VALUES (?, ?, ?, ?) RETURNING id")
        .bind(username)
        .bind(email)
        .bind(hashed)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Inserts a user row with a placeholder hash; for rows that never log in.
pub async fn insert_plain_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username, email, password) VALUES (?, ?, 'x') RETURNING id")
        .bind(username)
        .bind(unique_email(username))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_quiz(pool: &SqlitePool, title: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO quizzes (title) VALUES (?) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_submission(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    score: i64,
    submitted_at: &str,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO submissions (user_id, quiz_id, score, total, submitted_at) VALUES (?, ?, ?, 5, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(submitted_at)
    .fetch_one(pool)
    .await
    .unwrap()
}
