//! Logging settings derived from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LogLevel,
    /// JSON lines instead of human-readable output
    pub json: bool,
    pub directory: PathBuf,
}

impl LogSettings {
    /// LOG_LEVEL wins when it parses; otherwise info in production and
    /// debug everywhere else. LOG_DIR defaults to `logs`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::resolve(
            config.is_production(),
            std::env::var("LOG_LEVEL").ok().as_deref(),
            std::env::var("LOG_DIR").ok(),
        )
    }

    fn resolve(is_production: bool, level: Option<&str>, directory: Option<String>) -> Self {
        let fallback = if is_production {
            LogLevel::Info
        } else {
            LogLevel::Debug
        };

        Self {
            level: level.and_then(|l| l.parse().ok()).unwrap_or(fallback),
            json: is_production,
            directory: PathBuf::from(directory.unwrap_or_else(|| "logs".to_string())),
        }
    }

    pub fn filter_directive(&self) -> String {
        format!("council_cms={},tower_http=debug,axum=debug", self.level)
    }
}
