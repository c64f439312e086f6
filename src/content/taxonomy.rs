//! Category / subcategory store.
//!
//! Categories own a unique `url_path` that the public site routes on, so
//! paths used by the site itself are refused. Predefined categories are seeded
//! at startup; their path is frozen and they cannot be deleted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

use crate::content::slug::{is_valid_slug, slugify};
use crate::db::models::{Category, Subcategory};
use crate::error::{AppError, Result};

/// First path segments owned by the public site or this server.
pub const RESERVED_PATHS: &[&str] = &[
    "/admin",
    "/api",
    "/uploads",
    "/static",
    "/health",
    "/login",
    "/logout",
    "/content",
    "/councillors",
    "/contact",
    "/ktc-meetings",
    "/ktc-events",
    "/meetings",
    "/events",
];

const CATEGORY_COLUMNS: &str =
    "id, name, description, color, url_path, is_active, is_predefined, created_at, updated_at";
const SUBCATEGORY_COLUMNS: &str =
    "id, category_id, name, description, url_path, is_active, created_at, updated_at";

fn default_true() -> bool {
    true
}

/// Create/edit payload for a category. Edits overwrite every field; an
/// omitted `url_path` keeps the stored one (or is derived from the name on
/// create).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub url_path: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CategoryInput {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            color: None,
            url_path: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubcategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url_path: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SubcategoryInput {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            url_path: None,
            is_active: true,
        }
    }
}

/// A category with its subcategories and the number of pages filed under it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
    pub page_count: i64,
}

// ============================================================================
// url_path rules
// ============================================================================

/// Lower-case, single leading slash, no trailing slash.
pub fn normalize_url_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/').to_lowercase();
    format!("/{}", trimmed)
}

/// One or more slash-separated segments, each a valid slug.
pub fn is_valid_url_path(path: &str) -> bool {
    path.strip_prefix('/')
        .is_some_and(|rest| rest.split('/').all(is_valid_slug))
}

pub fn is_reserved_path(path: &str) -> bool {
    let first_segment = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or("");
    let first = format!("/{}", first_segment);
    RESERVED_PATHS.contains(&first.as_str())
}

fn resolve_url_path(requested: Option<&str>, name: &str) -> Result<String> {
    let path = match requested.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => normalize_url_path(p),
        None => normalize_url_path(&slugify(name)),
    };
    if !is_valid_url_path(&path) {
        return Err(AppError::validation(format!(
            "URL path '{}' may only contain lowercase letters, numbers, hyphens and slashes",
            path
        )));
    }
    Ok(path)
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(name.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// A write that lost the race for `(category_id, url_path)` is still a
/// validation failure, not a server error.
fn subcategory_write_error(e: sqlx::Error, url_path: &str) -> AppError {
    if is_unique_violation(&e) {
        AppError::validation(format!(
            "URL path '{}' is already used in this category",
            url_path
        ))
    } else {
        AppError::from(e)
    }
}

// ============================================================================
// Categories
// ============================================================================

pub async fn list_categories(pool: &SqlitePool, include_inactive: bool) -> Result<Vec<CategoryDetail>> {
    let sql = if include_inactive {
        format!("SELECT {} FROM categories ORDER BY name", CATEGORY_COLUMNS)
    } else {
        format!(
            "SELECT {} FROM categories WHERE is_active = 1 ORDER BY name",
            CATEGORY_COLUMNS
        )
    };
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;

    let mut conn = pool.acquire().await?;
    let mut details = Vec::with_capacity(categories.len());
    for category in categories {
        details.push(load_detail(&mut conn, category, include_inactive).await?);
    }
    Ok(details)
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> Result<CategoryDetail> {
    let mut conn = pool.acquire().await?;
    let category = fetch_category(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    load_detail(&mut conn, category, true).await
}

pub async fn get_category_by_path(pool: &SqlitePool, url_path: &str) -> Result<Category> {
    let path = normalize_url_path(url_path);
    sqlx::query_as::<_, Category>(&format!(
        "SELECT {} FROM categories WHERE url_path = ?",
        CATEGORY_COLUMNS
    ))
    .bind(&path)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Category '{}' not found", path)))
}

pub async fn create_category(pool: &SqlitePool, input: CategoryInput) -> Result<Category> {
    let name = require_name(&input.name)?;
    let url_path = resolve_url_path(input.url_path.as_deref(), &name)?;
    if is_reserved_path(&url_path) {
        return Err(AppError::validation(format!(
            "URL path '{}' is reserved by the website",
            url_path
        )));
    }

    let mut conn = pool.acquire().await?;
    ensure_category_path_free(&mut conn, &url_path, None).await?;

    let now = Utc::now();
    let category = sqlx::query_as::<_, Category>(&format!(
        r#"
        INSERT INTO categories
            (name, description, color, url_path, is_active, is_predefined, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING {}
        "#,
        CATEGORY_COLUMNS
    ))
    .bind(&name)
    .bind(non_empty(input.description))
    .bind(non_empty(input.color))
    .bind(&url_path)
    .bind(input.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::validation(format!("URL path '{}' is already in use", url_path))
        } else {
            AppError::from(e)
        }
    })?;

    tracing::info!(category_id = category.id, url_path = %category.url_path, "category created");
    Ok(category)
}

pub async fn edit_category(pool: &SqlitePool, id: i64, input: CategoryInput) -> Result<Category> {
    let mut conn = pool.acquire().await?;
    let existing = fetch_category(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;

    let name = require_name(&input.name)?;
    let url_path = match input.url_path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        None => existing.url_path.clone(),
        Some(requested) => {
            let path = resolve_url_path(Some(requested), &name)?;
            if path != existing.url_path {
                if existing.is_predefined {
                    return Err(AppError::validation(
                        "The URL path of a predefined category cannot be changed",
                    ));
                }
                if is_reserved_path(&path) {
                    return Err(AppError::validation(format!(
                        "URL path '{}' is reserved by the website",
                        path
                    )));
                }
                ensure_category_path_free(&mut conn, &path, Some(id)).await?;
            }
            path
        }
    };

    let category = sqlx::query_as::<_, Category>(&format!(
        r#"
        UPDATE categories
        SET name = ?, description = ?, color = ?, url_path = ?, is_active = ?, updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        CATEGORY_COLUMNS
    ))
    .bind(&name)
    .bind(non_empty(input.description))
    .bind(non_empty(input.color))
    .bind(&url_path)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::validation(format!("URL path '{}' is already in use", url_path))
        } else {
            AppError::from(e)
        }
    })?;

    tracing::info!(category_id = id, "category updated");
    Ok(category)
}

/// Delete a category and its subcategories. Refused for predefined
/// categories and for categories that still own pages.
pub async fn delete_category(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let category = fetch_category(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;

    if category.is_predefined {
        return Err(AppError::conflict(format!(
            "'{}' is a predefined category and cannot be deleted",
            category.name
        )));
    }

    let page_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM content_pages WHERE category_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if page_count > 0 {
        return Err(AppError::conflict(format!(
            "Category '{}' still has {} content page(s)",
            category.name, page_count
        )));
    }

    let removed_subcategories = sqlx::query("DELETE FROM subcategories WHERE category_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(category_id = id, removed_subcategories, "category deleted");
    Ok(())
}

pub(crate) async fn fetch_category(conn: &mut SqliteConnection, id: i64) -> Result<Option<Category>> {
    Ok(sqlx::query_as::<_, Category>(&format!(
        "SELECT {} FROM categories WHERE id = ?",
        CATEGORY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?)
}

async fn ensure_category_path_free(
    conn: &mut SqliteConnection,
    url_path: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE url_path = ?")
        .bind(url_path)
        .fetch_optional(&mut *conn)
        .await?;
    match owner {
        Some(owner) if Some(owner) != except_id => Err(AppError::validation(format!(
            "URL path '{}' is already in use",
            url_path
        ))),
        _ => Ok(()),
    }
}

async fn load_detail(
    conn: &mut SqliteConnection,
    category: Category,
    include_inactive: bool,
) -> Result<CategoryDetail> {
    let sql = if include_inactive {
        format!(
            "SELECT {} FROM subcategories WHERE category_id = ? ORDER BY name",
            SUBCATEGORY_COLUMNS
        )
    } else {
        format!(
            "SELECT {} FROM subcategories WHERE category_id = ? AND is_active = 1 ORDER BY name",
            SUBCATEGORY_COLUMNS
        )
    };
    let subcategories = sqlx::query_as::<_, Subcategory>(&sql)
        .bind(category.id)
        .fetch_all(&mut *conn)
        .await?;

    let page_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM content_pages WHERE category_id = ?")
            .bind(category.id)
            .fetch_one(&mut *conn)
            .await?;

    Ok(CategoryDetail {
        category,
        subcategories,
        page_count,
    })
}

// ============================================================================
// Subcategories
// ============================================================================

pub async fn create_subcategory(
    pool: &SqlitePool,
    category_id: i64,
    input: SubcategoryInput,
) -> Result<Subcategory> {
    let mut conn = pool.acquire().await?;
    if fetch_category(&mut conn, category_id).await?.is_none() {
        return Err(AppError::not_found(format!("Category {} not found", category_id)));
    }

    let name = require_name(&input.name)?;
    let url_path = resolve_url_path(input.url_path.as_deref(), &name)?;
    ensure_subcategory_path_free(&mut conn, category_id, &url_path, None).await?;

    let now = Utc::now();
    let subcategory = sqlx::query_as::<_, Subcategory>(&format!(
        r#"
        INSERT INTO subcategories
            (category_id, name, description, url_path, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        SUBCATEGORY_COLUMNS
    ))
    .bind(category_id)
    .bind(&name)
    .bind(non_empty(input.description))
    .bind(&url_path)
    .bind(input.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| subcategory_write_error(e, &url_path))?;

    tracing::info!(subcategory_id = subcategory.id, category_id, "subcategory created");
    Ok(subcategory)
}

pub async fn edit_subcategory(
    pool: &SqlitePool,
    id: i64,
    input: SubcategoryInput,
) -> Result<Subcategory> {
    let mut conn = pool.acquire().await?;
    let existing = fetch_subcategory(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subcategory {} not found", id)))?;

    let name = require_name(&input.name)?;
    let url_path = match input.url_path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        None => existing.url_path.clone(),
        Some(requested) => resolve_url_path(Some(requested), &name)?,
    };
    ensure_subcategory_path_free(&mut conn, existing.category_id, &url_path, Some(id)).await?;

    let subcategory = sqlx::query_as::<_, Subcategory>(&format!(
        r#"
        UPDATE subcategories
        SET name = ?, description = ?, url_path = ?, is_active = ?, updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        SUBCATEGORY_COLUMNS
    ))
    .bind(&name)
    .bind(non_empty(input.description))
    .bind(&url_path)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| subcategory_write_error(e, &url_path))?;

    tracing::info!(subcategory_id = id, "subcategory updated");
    Ok(subcategory)
}

/// Refused while any page still references the subcategory.
pub async fn delete_subcategory(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let subcategory = fetch_subcategory(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subcategory {} not found", id)))?;

    let page_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM content_pages WHERE subcategory_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if page_count > 0 {
        return Err(AppError::conflict(format!(
            "Subcategory '{}' still has {} content page(s)",
            subcategory.name, page_count
        )));
    }

    sqlx::query("DELETE FROM subcategories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(subcategory_id = id, "subcategory deleted");
    Ok(())
}

pub(crate) async fn fetch_subcategory(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Subcategory>> {
    Ok(sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {} FROM subcategories WHERE id = ?",
        SUBCATEGORY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?)
}

async fn ensure_subcategory_path_free(
    conn: &mut SqliteConnection,
    category_id: i64,
    url_path: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let owner: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM subcategories WHERE category_id = ? AND url_path = ?",
    )
    .bind(category_id)
    .bind(url_path)
    .fetch_optional(&mut *conn)
    .await?;
    match owner {
        Some(owner) if Some(owner) != except_id => Err(AppError::validation(format!(
            "URL path '{}' is already used in this category",
            url_path
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_normalize_url_path() {
        assert_eq!(normalize_url_path("Council-Tax/"), "/council-tax");
        assert_eq!(normalize_url_path("  /parks/play-areas/ "), "/parks/play-areas");
    }

    #[test]
    fn test_url_path_segments_must_be_slugs() {
        assert!(is_valid_url_path("/council-tax"));
        assert!(is_valid_url_path("/parks/play-areas"));
        assert!(!is_valid_url_path("/"));
        assert!(!is_valid_url_path("council-tax"));
        assert!(!is_valid_url_path("/parks//play"));
        assert!(!is_valid_url_path("/bins_and_recycling"));
        assert!(!is_valid_url_path("/trailing-"));
    }

    #[tokio::test]
    async fn test_subcategory_unique_violation_maps_to_validation() {
        let pool = db::init_memory_pool().await.unwrap();
        let parks = create_category(&pool, CategoryInput::named("Parks"))
            .await
            .unwrap();
        create_subcategory(&pool, parks.id, SubcategoryInput::named("Play Areas"))
            .await
            .unwrap();
        let sports = create_subcategory(&pool, parks.id, SubcategoryInput::named("Sports"))
            .await
            .unwrap();

        // Same write the edit path issues when another request claimed the path first.
        let err = sqlx::query("UPDATE subcategories SET url_path = ? WHERE id = ?")
            .bind("/play-areas")
            .bind(sports.id)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(
            subcategory_write_error(err, "/play-areas"),
            AppError::Validation(_)
        ));

        let err = edit_subcategory(
            &pool,
            sports.id,
            SubcategoryInput {
                url_path: Some("/play-areas".to_string()),
                ..SubcategoryInput::named("Sports")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reserved_path_checks_first_segment() {
        assert!(is_reserved_path("/admin"));
        assert!(is_reserved_path("/api/anything"));
        assert!(!is_reserved_path("/administration"));
        assert!(!is_reserved_path("/council-tax"));
    }

    #[tokio::test]
    async fn test_create_category_derives_path_from_name() {
        let pool = db::init_memory_pool().await.unwrap();
        let category = create_category(&pool, CategoryInput::named("Council Tax"))
            .await
            .unwrap();
        assert_eq!(category.url_path, "/council-tax");
        assert!(!category.is_predefined);
        assert!(category.is_active);
    }

    #[tokio::test]
    async fn test_create_category_rejects_reserved_path() {
        let pool = db::init_memory_pool().await.unwrap();
        let input = CategoryInput {
            url_path: Some("/admin".to_string()),
            ..CategoryInput::named("Admin Stuff")
        };
        let err = create_category(&pool, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_path() {
        let pool = db::init_memory_pool().await.unwrap();
        create_category(&pool, CategoryInput::named("Allotments"))
            .await
            .unwrap();
        let err = create_category(&pool, CategoryInput::named("allotments"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_category_rejects_predefined_path() {
        let pool = db::init_memory_pool().await.unwrap();
        let input = CategoryInput {
            url_path: Some("/planning".to_string()),
            ..CategoryInput::named("More Planning")
        };
        let err = create_category(&pool, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_category_rejects_blank_name() {
        let pool = db::init_memory_pool().await.unwrap();
        let err = create_category(&pool, CategoryInput::named("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_predefined_category_allows_name_edit_but_not_path() {
        let pool = db::init_memory_pool().await.unwrap();
        let planning = get_category_by_path(&pool, "/planning").await.unwrap();

        let renamed = edit_category(
            &pool,
            planning.id,
            CategoryInput {
                color: Some("#000000".to_string()),
                ..CategoryInput::named("Planning & Development")
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Planning & Development");
        assert_eq!(renamed.url_path, "/planning");

        let err = edit_category(
            &pool,
            planning.id,
            CategoryInput {
                url_path: Some("/development".to_string()),
                ..CategoryInput::named("Planning")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_predefined_category_conflicts() {
        let pool = db::init_memory_pool().await.unwrap();
        let community = get_category_by_path(&pool, "/community").await.unwrap();
        let err = delete_category(&pool, community.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_category_removes_subcategories() {
        let pool = db::init_memory_pool().await.unwrap();
        let category = create_category(&pool, CategoryInput::named("Parks"))
            .await
            .unwrap();
        create_subcategory(&pool, category.id, SubcategoryInput::named("Play Areas"))
            .await
            .unwrap();

        delete_category(&pool, category.id).await.unwrap();

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subcategories WHERE category_id = ?")
                .bind(category.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(
            get_category(&pool, category.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let pool = db::init_memory_pool().await.unwrap();
        let err = delete_category(&pool, 9999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_subcategory_path_unique_within_category_only() {
        let pool = db::init_memory_pool().await.unwrap();
        let parks = create_category(&pool, CategoryInput::named("Parks"))
            .await
            .unwrap();
        let halls = create_category(&pool, CategoryInput::named("Halls"))
            .await
            .unwrap();

        create_subcategory(&pool, parks.id, SubcategoryInput::named("Bookings"))
            .await
            .unwrap();
        create_subcategory(&pool, halls.id, SubcategoryInput::named("Bookings"))
            .await
            .unwrap();

        let err = create_subcategory(&pool, parks.id, SubcategoryInput::named("Bookings"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_subcategory_for_missing_category() {
        let pool = db::init_memory_pool().await.unwrap();
        let err = create_subcategory(&pool, 4242, SubcategoryInput::named("Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_categories_hides_inactive_for_public() {
        let pool = db::init_memory_pool().await.unwrap();
        create_category(
            &pool,
            CategoryInput {
                is_active: false,
                ..CategoryInput::named("Hidden")
            },
        )
        .await
        .unwrap();

        let public = list_categories(&pool, false).await.unwrap();
        assert!(public.iter().all(|c| c.category.name != "Hidden"));

        let all = list_categories(&pool, true).await.unwrap();
        assert!(all.iter().any(|c| c.category.name == "Hidden"));
    }
}
