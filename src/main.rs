// src/main.rs

use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use quiz_portal::{
    config::{Config, Deployment},
    db, routes,
    state::AppState,
    views::TeraViews,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let pool = db::connect(&config.database_url).await?;
    tracing::info!("Database connected...");

    db::migrate(&pool).await?;

    // Seed Admin User
    if let Err(e) = db::seed_admin_user(&pool, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    let views = TeraViews::from_dir(&config.views_dir).map_err(|e| {
        tracing::error!("Failed to load views from {}: {:?}", config.views_dir.display(), e);
        e
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    if config.deployment == Deployment::Vercel {
        tracing::info!("VERCEL marker set; serving for platform-managed invocation");
    }

    let state = AppState {
        pool,
        config,
        views: Arc::new(views),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on http://localhost:{}", addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}
