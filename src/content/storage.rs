//! File storage for page attachments (gallery images and downloads).

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Save `bytes` under a unique name derived from `original_name` and
    /// return the stored filename.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_root().await?;

        let cleaned = sanitize_filename(original_name);
        let filename = if cleaned.is_empty() {
            Uuid::new_v4().simple().to_string()
        } else {
            format!("{}_{}", Uuid::new_v4().simple(), cleaned)
        };

        tokio::fs::write(self.root.join(&filename), bytes).await?;
        tracing::info!(filename = %filename, size = bytes.len(), "stored upload");

        Ok(filename)
    }

    pub async fn exists(&self, filename: &str) -> bool {
        is_safe_filename(filename)
            && tokio::fs::try_exists(self.root.join(filename))
                .await
                .unwrap_or(false)
    }

    pub async fn remove(&self, filename: &str) -> Result<()> {
        if !is_safe_filename(filename) {
            return Err(AppError::validation(format!("Invalid filename: {}", filename)));
        }
        tokio::fs::remove_file(self.root.join(filename)).await?;
        tracing::info!(filename = %filename, "removed stored file");
        Ok(())
    }

    /// Remove every file in `filenames`. Database rows are already gone when
    /// this runs, so failures are logged and returned as leaked names rather
    /// than raised.
    pub async fn remove_all(&self, filenames: &[String]) -> Vec<String> {
        let mut leaked = Vec::new();
        for filename in filenames {
            if let Err(e) = self.remove(filename).await {
                tracing::warn!(filename = %filename, error = %e, "failed to remove stored file");
                leaked.push(filename.clone());
            }
        }
        leaked
    }
}

pub fn public_url(filename: &str) -> String {
    format!("{}/{}", PUBLIC_PREFIX, filename)
}

/// Reject path traversal and separators.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

/// Keep ASCII alphanumerics, dots, dashes and underscores; spaces become
/// underscores and leading dots are dropped.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
