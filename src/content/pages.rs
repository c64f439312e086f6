//! Content page lifecycle: create, full-overwrite update with child
//! collection replacement, and cascading delete.
//!
//! Every mutation runs in a single transaction. Stored files belonging to
//! removed children are deleted only after the commit; a failed removal is
//! logged and reported back as a leaked file, never as a failed operation.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::content::slug::unique_page_slug;
use crate::content::storage::{is_safe_filename, FileStorage};
use crate::content::taxonomy::{fetch_category, fetch_subcategory};
use crate::db::models::{
    ContentPage, ContentPageWithChildren, ContentStatus, Download, GalleryImage, RelatedLink,
};
use crate::error::{AppError, Result};

const PAGE_COLUMNS: &str = "id, title, slug, short_description, long_description, category_id, \
     subcategory_id, status, is_featured, creation_date, approval_date, last_reviewed, \
     next_review_date, created_at, updated_at";

// ============================================================================
// Input types
// ============================================================================

/// Full desired state of a page. On update every scalar is overwritten
/// (`None` clears optional fields; a missing `creation_date` keeps the stored
/// one) and each child list is the complete target collection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageInput {
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
    #[serde(default)]
    pub approval_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_reviewed: Option<NaiveDate>,
    #[serde(default)]
    pub next_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub gallery_images: Vec<GalleryImageInput>,
    #[serde(default)]
    pub downloads: Vec<DownloadInput>,
    #[serde(default)]
    pub related_links: Vec<RelatedLinkInput>,
}

impl PageInput {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// Gallery entry. With `id` it edits an existing image (a new
/// `image_filename` replaces the stored file); without it, it adds one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GalleryImageInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DownloadInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelatedLinkInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub new_tab: bool,
}

/// Filters for page listings; all set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageFilter {
    pub status: Option<ContentStatus>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub featured: Option<bool>,
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SavedPage {
    #[serde(flatten)]
    pub page: ContentPageWithChildren,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leaked_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedPage {
    pub id: i64,
    pub slug: String,
    pub removed_files: Vec<String>,
    pub leaked_files: Vec<String>,
}

// ============================================================================
// Validation helpers
// ============================================================================

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn sanitize_html(html: Option<String>) -> Option<String> {
    trimmed(html).map(|h| ammonia::clean(&h))
}

fn is_valid_link_url(url: &str) -> bool {
    ["http://", "https://", "mailto:", "tel:", "/"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Check the category exists and the subcategory (if any) belongs to it.
async fn validate_taxonomy(
    conn: &mut SqliteConnection,
    category_id: Option<i64>,
    subcategory_id: Option<i64>,
) -> Result<()> {
    if let Some(category_id) = category_id {
        if fetch_category(conn, category_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Category {} does not exist",
                category_id
            )));
        }
    }

    if let Some(subcategory_id) = subcategory_id {
        let subcategory = fetch_subcategory(conn, subcategory_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Subcategory {} does not exist", subcategory_id))
            })?;
        match category_id {
            None => {
                return Err(AppError::validation(
                    "A subcategory can only be set together with its category",
                ))
            }
            Some(category_id) if subcategory.category_id != category_id => {
                return Err(AppError::validation(format!(
                    "Subcategory '{}' does not belong to the selected category",
                    subcategory.name
                )))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

async fn require_stored_file(storage: &FileStorage, filename: &str) -> Result<()> {
    if !is_safe_filename(filename) || !storage.exists(filename).await {
        return Err(AppError::validation(format!(
            "Uploaded file '{}' was not found",
            filename
        )));
    }
    Ok(())
}

/// Ids of stored children that are absent from the submission and must be
/// deleted. Submitted ids must belong to the stored set and appear once.
pub fn removed_child_ids(stored: &[i64], submitted: &[Option<i64>], kind: &str) -> Result<Vec<i64>> {
    let stored_set: HashSet<i64> = stored.iter().copied().collect();
    let mut seen = HashSet::new();

    for id in submitted.iter().flatten() {
        if !stored_set.contains(id) {
            return Err(AppError::validation(format!(
                "{} {} does not belong to this page",
                kind, id
            )));
        }
        if !seen.insert(*id) {
            return Err(AppError::validation(format!(
                "{} {} was submitted more than once",
                kind, id
            )));
        }
    }

    Ok(stored
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect())
}

async fn validate_children(storage: &FileStorage, input: &PageInput) -> Result<()> {
    for image in &input.gallery_images {
        match (image.id, image.image_filename.as_deref()) {
            (_, Some(filename)) => require_stored_file(storage, filename).await?,
            (None, None) => {
                return Err(AppError::validation(
                    "A new gallery image needs an uploaded image file",
                ))
            }
            (Some(_), None) => {}
        }
    }

    for download in &input.downloads {
        if download.title.trim().is_empty() {
            return Err(AppError::validation("Every download needs a title"));
        }
        match (download.id, download.filename.as_deref()) {
            (_, Some(filename)) => require_stored_file(storage, filename).await?,
            (None, None) => {
                return Err(AppError::validation(format!(
                    "Download '{}' needs an uploaded file",
                    download.title.trim()
                )))
            }
            (Some(_), None) => {}
        }
    }

    for link in &input.related_links {
        if link.title.trim().is_empty() {
            return Err(AppError::validation("Every related link needs a title"));
        }
        if !is_valid_link_url(link.url.trim()) {
            return Err(AppError::validation(format!(
                "Related link '{}' has an invalid URL",
                link.title.trim()
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Queries
// ============================================================================

pub async fn get_page(pool: &SqlitePool, id: i64) -> Result<ContentPageWithChildren> {
    let mut conn = pool.acquire().await?;
    let page = fetch_page(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content page {} not found", id)))?;
    with_children(&mut conn, page).await
}

pub async fn get_page_by_slug(pool: &SqlitePool, slug: &str) -> Result<ContentPageWithChildren> {
    let mut conn = pool.acquire().await?;
    let page = sqlx::query_as::<_, ContentPage>(&format!(
        "SELECT {} FROM content_pages WHERE slug = ?",
        PAGE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Content page '{}' not found", slug)))?;
    with_children(&mut conn, page).await
}

pub async fn list_pages(pool: &SqlitePool, filter: &PageFilter) -> Result<Vec<ContentPage>> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM content_pages WHERE 1 = 1", PAGE_COLUMNS));

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category_id) = filter.category_id {
        query.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(subcategory_id) = filter.subcategory_id {
        query.push(" AND subcategory_id = ").push_bind(subcategory_id);
    }
    if let Some(featured) = filter.featured {
        query.push(" AND is_featured = ").push_bind(featured);
    }
    query.push(" ORDER BY is_featured DESC, title COLLATE NOCASE, id");

    Ok(query
        .build_query_as::<ContentPage>()
        .fetch_all(pool)
        .await?)
}

async fn fetch_page(conn: &mut SqliteConnection, id: i64) -> Result<Option<ContentPage>> {
    Ok(sqlx::query_as::<_, ContentPage>(&format!(
        "SELECT {} FROM content_pages WHERE id = ?",
        PAGE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?)
}

async fn with_children(
    conn: &mut SqliteConnection,
    page: ContentPage,
) -> Result<ContentPageWithChildren> {
    let gallery_images = sqlx::query_as::<_, GalleryImage>(
        r#"
        SELECT id, page_id, image_filename, title, alt_text, description, sort_order
        FROM content_gallery_images WHERE page_id = ? ORDER BY sort_order, id
        "#,
    )
    .bind(page.id)
    .fetch_all(&mut *conn)
    .await?;

    let downloads = sqlx::query_as::<_, Download>(
        r#"
        SELECT id, page_id, title, description, filename, original_filename, sort_order
        FROM content_downloads WHERE page_id = ? ORDER BY sort_order, id
        "#,
    )
    .bind(page.id)
    .fetch_all(&mut *conn)
    .await?;

    let related_links = sqlx::query_as::<_, RelatedLink>(
        r#"
        SELECT id, page_id, title, url, new_tab, sort_order
        FROM content_related_links WHERE page_id = ? ORDER BY sort_order, id
        "#,
    )
    .bind(page.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ContentPageWithChildren {
        page,
        gallery_images,
        downloads,
        related_links,
    })
}

// ============================================================================
// Mutations
// ============================================================================

pub async fn create_page(
    pool: &SqlitePool,
    storage: &FileStorage,
    input: PageInput,
) -> Result<SavedPage> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    validate_children(storage, &input).await?;

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    validate_taxonomy(&mut tx, input.category_id, input.subcategory_id).await?;
    let slug = unique_page_slug(&mut tx, &title, now.timestamp()).await?;

    let page_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO content_pages
            (title, slug, short_description, long_description, category_id, subcategory_id,
             status, is_featured, creation_date, approval_date, last_reviewed, next_review_date,
             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&title)
    .bind(&slug)
    .bind(trimmed(input.short_description.clone()))
    .bind(sanitize_html(input.long_description.clone()))
    .bind(input.category_id)
    .bind(input.subcategory_id)
    .bind(input.status.as_str())
    .bind(input.is_featured)
    .bind(input.creation_date.unwrap_or_else(|| now.date_naive()))
    .bind(input.approval_date)
    .bind(input.last_reviewed)
    .bind(input.next_review_date)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    // Nothing is stored yet, so every submitted child is an add.
    let orphaned = replace_children(&mut tx, page_id, &input).await?;
    debug_assert!(orphaned.is_empty());

    let page = fetch_page(&mut tx, page_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content page {} not found", page_id)))?;
    let page = with_children(&mut tx, page).await?;

    tx.commit().await?;

    tracing::info!(page_id, slug = %slug, status = %input.status, "content page created");
    Ok(SavedPage {
        page,
        leaked_files: Vec::new(),
    })
}

pub async fn update_page(
    pool: &SqlitePool,
    storage: &FileStorage,
    id: i64,
    input: PageInput,
) -> Result<SavedPage> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    validate_children(storage, &input).await?;

    let mut tx = pool.begin().await?;

    let existing = fetch_page(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content page {} not found", id)))?;
    validate_taxonomy(&mut tx, input.category_id, input.subcategory_id).await?;

    sqlx::query(
        r#"
        UPDATE content_pages
        SET title = ?, short_description = ?, long_description = ?, category_id = ?,
            subcategory_id = ?, status = ?, is_featured = ?, creation_date = ?,
            approval_date = ?, last_reviewed = ?, next_review_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&title)
    .bind(trimmed(input.short_description.clone()))
    .bind(sanitize_html(input.long_description.clone()))
    .bind(input.category_id)
    .bind(input.subcategory_id)
    .bind(input.status.as_str())
    .bind(input.is_featured)
    .bind(input.creation_date.unwrap_or(existing.creation_date))
    .bind(input.approval_date)
    .bind(input.last_reviewed)
    .bind(input.next_review_date)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let orphaned = replace_children(&mut tx, id, &input).await?;
    let orphaned = unreferenced_files(&mut tx, orphaned).await?;

    let page = fetch_page(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content page {} not found", id)))?;
    let page = with_children(&mut tx, page).await?;

    tx.commit().await?;

    let leaked_files = storage.remove_all(&orphaned).await;
    tracing::info!(
        page_id = id,
        status = %input.status,
        removed_files = orphaned.len() - leaked_files.len(),
        leaked_files = leaked_files.len(),
        "content page updated"
    );

    Ok(SavedPage { page, leaked_files })
}

pub async fn delete_page(pool: &SqlitePool, storage: &FileStorage, id: i64) -> Result<DeletedPage> {
    let mut tx = pool.begin().await?;

    let page = fetch_page(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content page {} not found", id)))?;

    let mut files: Vec<String> =
        sqlx::query_scalar("SELECT image_filename FROM content_gallery_images WHERE page_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
    let download_files: Vec<String> =
        sqlx::query_scalar("SELECT filename FROM content_downloads WHERE page_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
    files.extend(download_files);

    for table in [
        "content_gallery_images",
        "content_downloads",
        "content_related_links",
    ] {
        sqlx::query(&format!("DELETE FROM {} WHERE page_id = ?", table))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM content_pages WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let files = unreferenced_files(&mut tx, files).await?;

    tx.commit().await?;

    let leaked_files = storage.remove_all(&files).await;
    let removed_files: Vec<String> = files
        .into_iter()
        .filter(|f| !leaked_files.contains(f))
        .collect();

    tracing::info!(
        page_id = id,
        slug = %page.slug,
        removed_files = removed_files.len(),
        leaked_files = leaked_files.len(),
        "content page deleted"
    );

    Ok(DeletedPage {
        id,
        slug: page.slug,
        removed_files,
        leaked_files,
    })
}

/// Narrow removal candidates to files no gallery image or download row
/// still points at, on this page or any other. Run after the child rows
/// have been rewritten, inside the same transaction.
async fn unreferenced_files(
    conn: &mut SqliteConnection,
    candidates: Vec<String>,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut unreferenced = Vec::new();

    for filename in candidates {
        if filename.is_empty() || !seen.insert(filename.clone()) {
            continue;
        }
        let still_used: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM content_gallery_images WHERE image_filename = ?)
                OR EXISTS (SELECT 1 FROM content_downloads WHERE filename = ?)
            "#,
        )
        .bind(&filename)
        .bind(&filename)
        .fetch_one(&mut *conn)
        .await?;

        if still_used != 0 {
            tracing::debug!(filename = %filename, "stored file still referenced, keeping it");
        } else {
            unreferenced.push(filename);
        }
    }

    Ok(unreferenced)
}

/// Bring all three child collections of `page_id` to the submitted state.
/// Returns stored filenames no longer referenced (to delete after commit).
async fn replace_children(
    conn: &mut SqliteConnection,
    page_id: i64,
    input: &PageInput,
) -> Result<Vec<String>> {
    let mut orphaned = Vec::new();
    orphaned.extend(replace_gallery(conn, page_id, &input.gallery_images).await?);
    orphaned.extend(replace_downloads(conn, page_id, &input.downloads).await?);
    replace_links(conn, page_id, &input.related_links).await?;
    Ok(orphaned)
}

async fn replace_gallery(
    conn: &mut SqliteConnection,
    page_id: i64,
    images: &[GalleryImageInput],
) -> Result<Vec<String>> {
    let stored: Vec<(i64, String)> = sqlx::query_as(
        "SELECT id, image_filename FROM content_gallery_images WHERE page_id = ?",
    )
    .bind(page_id)
    .fetch_all(&mut *conn)
    .await?;

    let stored_ids: Vec<i64> = stored.iter().map(|(id, _)| *id).collect();
    let submitted: Vec<Option<i64>> = images.iter().map(|i| i.id).collect();
    let removed = removed_child_ids(&stored_ids, &submitted, "Gallery image")?;

    let mut orphaned = Vec::new();
    for id in &removed {
        sqlx::query("DELETE FROM content_gallery_images WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }
    orphaned.extend(
        stored
            .iter()
            .filter(|(id, _)| removed.contains(id))
            .map(|(_, f)| f.clone()),
    );

    for (position, image) in images.iter().enumerate() {
        let sort_order = position as i64;
        match image.id {
            Some(id) => {
                let current = stored
                    .iter()
                    .find(|(stored_id, _)| *stored_id == id)
                    .map(|(_, f)| f.clone())
                    .unwrap_or_default();
                let filename = image.image_filename.clone().unwrap_or_else(|| current.clone());
                if filename != current {
                    orphaned.push(current);
                }
                sqlx::query(
                    r#"
                    UPDATE content_gallery_images
                    SET image_filename = ?, title = ?, alt_text = ?, description = ?, sort_order = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&filename)
                .bind(trimmed(image.title.clone()))
                .bind(trimmed(image.alt_text.clone()))
                .bind(trimmed(image.description.clone()))
                .bind(sort_order)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO content_gallery_images
                        (page_id, image_filename, title, alt_text, description, sort_order)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(page_id)
                .bind(image.image_filename.as_deref().unwrap_or_default())
                .bind(trimmed(image.title.clone()))
                .bind(trimmed(image.alt_text.clone()))
                .bind(trimmed(image.description.clone()))
                .bind(sort_order)
                .execute(&mut *conn)
                .await?;
            }
        }
    }

    Ok(orphaned)
}

async fn replace_downloads(
    conn: &mut SqliteConnection,
    page_id: i64,
    downloads: &[DownloadInput],
) -> Result<Vec<String>> {
    let stored: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, filename FROM content_downloads WHERE page_id = ?")
            .bind(page_id)
            .fetch_all(&mut *conn)
            .await?;

    let stored_ids: Vec<i64> = stored.iter().map(|(id, _)| *id).collect();
    let submitted: Vec<Option<i64>> = downloads.iter().map(|d| d.id).collect();
    let removed = removed_child_ids(&stored_ids, &submitted, "Download")?;

    let mut orphaned = Vec::new();
    for id in &removed {
        sqlx::query("DELETE FROM content_downloads WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }
    orphaned.extend(
        stored
            .iter()
            .filter(|(id, _)| removed.contains(id))
            .map(|(_, f)| f.clone()),
    );

    for (position, download) in downloads.iter().enumerate() {
        let sort_order = position as i64;
        match download.id {
            Some(id) => {
                let current = stored
                    .iter()
                    .find(|(stored_id, _)| *stored_id == id)
                    .map(|(_, f)| f.clone())
                    .unwrap_or_default();
                let filename = download.filename.clone().unwrap_or_else(|| current.clone());
                let replaced = filename != current;
                if replaced {
                    orphaned.push(current);
                }
                // Keep the recorded original name unless the file itself changed.
                sqlx::query(
                    r#"
                    UPDATE content_downloads
                    SET title = ?, description = ?, filename = ?,
                        original_filename = CASE WHEN ? THEN ? ELSE COALESCE(?, original_filename) END,
                        sort_order = ?
                    WHERE id = ?
                    "#,
                )
                .bind(download.title.trim())
                .bind(trimmed(download.description.clone()))
                .bind(&filename)
                .bind(replaced)
                .bind(trimmed(download.original_filename.clone()))
                .bind(trimmed(download.original_filename.clone()))
                .bind(sort_order)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO content_downloads
                        (page_id, title, description, filename, original_filename, sort_order)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(page_id)
                .bind(download.title.trim())
                .bind(trimmed(download.description.clone()))
                .bind(download.filename.as_deref().unwrap_or_default())
                .bind(trimmed(download.original_filename.clone()))
                .bind(sort_order)
                .execute(&mut *conn)
                .await?;
            }
        }
    }

    Ok(orphaned)
}

async fn replace_links(
    conn: &mut SqliteConnection,
    page_id: i64,
    links: &[RelatedLinkInput],
) -> Result<()> {
    let stored_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM content_related_links WHERE page_id = ?")
            .bind(page_id)
            .fetch_all(&mut *conn)
            .await?;

    let submitted: Vec<Option<i64>> = links.iter().map(|l| l.id).collect();
    for id in removed_child_ids(&stored_ids, &submitted, "Related link")? {
        sqlx::query("DELETE FROM content_related_links WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    for (position, link) in links.iter().enumerate() {
        let sort_order = position as i64;
        match link.id {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE content_related_links
                    SET title = ?, url = ?, new_tab = ?, sort_order = ?
                    WHERE id = ?
                    "#,
                )
                .bind(link.title.trim())
                .bind(link.url.trim())
                .bind(link.new_tab)
                .bind(sort_order)
                .bind(id)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO content_related_links (page_id, title, url, new_tab, sort_order)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(page_id)
                .bind(link.title.trim())
                .bind(link.url.trim())
                .bind(link.new_tab)
                .bind(sort_order)
                .execute(&mut *conn)
                .await?;
            }
        }
    }

    Ok(())
}
