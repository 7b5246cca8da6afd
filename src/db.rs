// src/db.rs

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{config::Config, error::AppError, utils::hash::hash_password};

const CONNECT_RETRIES: u32 = 5;

/// Opens the process-wide connection pool, retrying while the database is unavailable.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut retry_count = 0;
    loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_RETRIES {
                    tracing::error!("Failed to connect to database after {} retries", CONNECT_RETRIES);
                    return Err(e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

/// Applies the bundled schema.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations applied successfully.");
    Ok(())
}

/// Creates the configured admin account unless its email is already taken.
pub async fn seed_admin_user(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    if existing.is_none() {
        tracing::info!("Seeding admin user: {}", email);
        let hashed_password = hash_password(password)?;

        sqlx::query("INSERT INTO users (username, email, password, role) VALUES (?, ?, ?, 'admin')")
            .bind(&config.admin_username)
            .bind(&email)
            .bind(hashed_password)
            .execute(pool)
            .await?;
        tracing::info!("Admin user created successfully.");
    }

    Ok(())
}
