pub mod models;

use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

use crate::config::AppConfig;

/// Categories seeded on every start: (name, url_path, color, description).
/// Their url_path is fixed and they can never be deleted.
pub const PREDEFINED_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    (
        "Council Information",
        "/council-information",
        "#166534",
        "How the council works, its powers and its responsibilities",
    ),
    (
        "Community",
        "/community",
        "#1d4ed8",
        "Groups, facilities and services in the town",
    ),
    (
        "Planning",
        "/planning",
        "#b45309",
        "Planning applications, consultations and the neighbourhood plan",
    ),
    (
        "Environment",
        "/environment",
        "#15803d",
        "Open spaces, allotments, waste and green initiatives",
    ),
];

pub async fn init_pool(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Initializing database connection pool...");
    tracing::debug!("Database URL: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect_with(options)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

/// Single-connection in-memory database with the schema and seed data applied.
pub async fn init_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    // Every connection to :memory: is a separate database, so keep exactly one alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    seed_predefined_categories(&pool).await?;

    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> Result<std::time::Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;

    Ok(start.elapsed())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            color TEXT,
            url_path TEXT NOT NULL UNIQUE,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            is_predefined BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subcategories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT,
            url_path TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (category_id, url_path)
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            short_description TEXT,
            long_description TEXT,
            category_id INTEGER REFERENCES categories(id),
            subcategory_id INTEGER REFERENCES subcategories(id),
            status TEXT NOT NULL DEFAULT 'Draft'
                CHECK (status IN ('Draft', 'Published', 'Archived')),
            is_featured BOOLEAN NOT NULL DEFAULT 0,
            creation_date TEXT NOT NULL,
            approval_date TEXT,
            last_reviewed TEXT,
            next_review_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_gallery_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_id INTEGER NOT NULL REFERENCES content_pages(id) ON DELETE CASCADE,
            image_filename TEXT NOT NULL,
            title TEXT,
            alt_text TEXT,
            description TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_downloads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_id INTEGER NOT NULL REFERENCES content_pages(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            filename TEXT NOT NULL,
            original_filename TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_related_links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_id INTEGER NOT NULL REFERENCES content_pages(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            new_tab BOOLEAN NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )
    "#,
    )
    .execute(pool)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_subcategories_category ON subcategories(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_content_pages_category ON content_pages(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_content_pages_subcategory ON content_pages(subcategory_id)",
        "CREATE INDEX IF NOT EXISTS idx_content_pages_status ON content_pages(status)",
        "CREATE INDEX IF NOT EXISTS idx_content_pages_next_review ON content_pages(next_review_date)",
        "CREATE INDEX IF NOT EXISTS idx_gallery_page ON content_gallery_images(page_id, sort_order)",
        "CREATE INDEX IF NOT EXISTS idx_downloads_page ON content_downloads(page_id, sort_order)",
        "CREATE INDEX IF NOT EXISTS idx_related_links_page ON content_related_links(page_id, sort_order)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// Insert the predefined categories that are missing. Existing rows are left
/// alone so administrator edits to name/description/color survive restarts.
pub async fn seed_predefined_categories(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let mut inserted = 0u64;

    for (name, url_path, color, description) in PREDEFINED_CATEGORIES {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories
                (name, description, color, url_path, is_active, is_predefined, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, 1, ?, ?)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(url_path)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    if inserted > 0 {
        tracing::info!(inserted, "Seeded predefined categories");
    }

    Ok(())
}
