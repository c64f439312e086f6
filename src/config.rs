//! Process configuration, read from environment variables.

use axum::http::HeaderValue;
use std::path::PathBuf;

pub const DEFAULT_JWT_SECRET: &str = "default-jwt-secret-change-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub admin_email: String,
    /// bcrypt hash of the admin password
    pub admin_password_hash: String,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self {
            environment,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://council_cms.db?mode=rwc".to_string()),
            max_connections: std::env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password_hash: admin_password_hash_from_env(),
            allowed_origins: allowed_origins_from_env(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Refuse to run in production with credentials that ship in the source.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() {
            if self.jwt_secret.is_empty() || self.jwt_secret == DEFAULT_JWT_SECRET {
                return Err(
                    "JWT_SECRET must be set to a secure, unique value in production".to_string(),
                );
            }
            if self.admin_password_hash.is_empty() {
                return Err(
                    "ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set in production".to_string(),
                );
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn admin_password_hash_from_env() -> String {
    if let Ok(hash) = std::env::var("ADMIN_PASSWORD_HASH") {
        return hash;
    }
    if let Ok(plain) = std::env::var("ADMIN_PASSWORD") {
        return bcrypt::hash(&plain, bcrypt::DEFAULT_COST).unwrap_or_default();
    }
    if std::env::var("ENVIRONMENT").as_deref() == Ok("production") {
        return String::new();
    }
    tracing::warn!("No admin password configured, falling back to the development default");
    bcrypt::hash("admin123", bcrypt::DEFAULT_COST).unwrap_or_default()
}

/// ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN, else the local
/// frontend dev server.
fn allowed_origins_from_env() -> Vec<HeaderValue> {
    std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ]
        })
}
