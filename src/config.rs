// src/config.rs

use std::{env, path::PathBuf};
use dotenvy::dotenv;

/// Where the process is running. Reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Vercel,
}

impl Deployment {
    /// Any non-empty `VERCEL` value marks a platform deployment.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some(value) if !value.is_empty() => Deployment::Vercel,
            _ => Deployment::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Local => "local",
            Deployment::Vercel => "vercel",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub deployment: Deployment,
    pub public_dir: PathBuf,
    pub views_dir: PathBuf,
    pub admin_username: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quiz_portal.db".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let deployment = Deployment::from_marker(env::var("VERCEL").ok().as_deref());

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let views_dir = env::var("VIEWS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("templates"));

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            deployment,
            public_dir,
            views_dir,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Deployment;

    #[test]
    fn vercel_marker_is_truthy_when_non_empty() {
        assert_eq!(Deployment::from_marker(None), Deployment::Local);
        assert_eq!(Deployment::from_marker(Some("")), Deployment::Local);
        assert_eq!(Deployment::from_marker(Some("1")), Deployment::Vercel);
        assert_eq!(Deployment::from_marker(Some("0")), Deployment::Vercel);
        assert_eq!(Deployment::Vercel.as_str(), "vercel");
    }
}
