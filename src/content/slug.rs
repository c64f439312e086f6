//! Slug and url_path derivation.

use regex::Regex;
use sqlx::SqliteConnection;

use crate::error::Result;

lazy_static::lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s-]+").unwrap();
    /// Valid slug: lowercase letters, numbers, and single hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Lower-case the title, drop everything but alphanumerics, spaces and
/// hyphens, then collapse whitespace/hyphen runs into a single hyphen.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = SEPARATORS.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Slug for a new page. On collision a unix-timestamp suffix is appended,
/// bumped until free so pages created within the same second stay distinct.
pub async fn unique_page_slug(
    conn: &mut SqliteConnection,
    title: &str,
    now_unix: i64,
) -> Result<String> {
    let mut base = slugify(title);
    if base.is_empty() {
        base = "page".to_string();
    }

    if !slug_exists(conn, &base).await? {
        return Ok(base);
    }

    let mut suffix = now_unix;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !slug_exists(conn, &candidate).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

async fn slug_exists(conn: &mut SqliteConnection, slug: &str) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM content_pages WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}
