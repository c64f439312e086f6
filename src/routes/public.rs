/**
 * Public Content Routes
 * Read-only projections of published content for the website frontend
 */
use axum::{
    extract::State,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content::pages::{self, PageFilter};
use crate::content::storage::public_url;
use crate::content::taxonomy::{self, CategoryDetail};
use crate::db::models::{
    Category, ContentPage, ContentPageWithChildren, ContentStatus, Download, GalleryImage,
    RelatedLink, Subcategory,
};
use crate::error::{AppError, Result};
use crate::routes::extract::{AppPath, AppQuery};
use crate::AppState;

// ============================================================================
// Projections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub url_path: String,
    pub color: Option<String>,
}

impl From<&Category> for CategoryRef {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            url_path: c.url_path.clone(),
            color: c.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryRef {
    pub id: i64,
    pub name: String,
    pub url_path: String,
    pub description: Option<String>,
}

impl From<&Subcategory> for SubcategoryRef {
    fn from(s: &Subcategory) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            url_path: s.url_path.clone(),
            description: s.description.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub url_path: String,
    pub subcategories: Vec<SubcategoryRef>,
}

impl From<CategoryDetail> for PublicCategory {
    fn from(detail: CategoryDetail) -> Self {
        Self {
            subcategories: detail
                .subcategories
                .iter()
                .filter(|s| s.is_active)
                .map(SubcategoryRef::from)
                .collect(),
            id: detail.category.id,
            name: detail.category.name,
            description: detail.category.description,
            color: detail.category.color,
            url_path: detail.category.url_path,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub is_featured: bool,
    pub creation_date: NaiveDate,
    pub approval_date: Option<NaiveDate>,
    pub category: Option<CategoryRef>,
    pub subcategory: Option<SubcategoryRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicGalleryImage {
    pub id: i64,
    pub image_url: String,
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub description: Option<String>,
}

impl From<GalleryImage> for PublicGalleryImage {
    fn from(image: GalleryImage) -> Self {
        Self {
            id: image.id,
            image_url: public_url(&image.image_filename),
            title: image.title,
            alt_text: image.alt_text,
            description: image.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicDownload {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Name shown to visitors; the original upload name when known
    pub filename: String,
    pub download_url: String,
}

impl From<Download> for PublicDownload {
    fn from(download: Download) -> Self {
        Self {
            id: download.id,
            download_url: public_url(&download.filename),
            filename: download.original_filename.unwrap_or(download.filename),
            title: download.title,
            description: download.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicRelatedLink {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub new_tab: bool,
}

impl From<RelatedLink> for PublicRelatedLink {
    fn from(link: RelatedLink) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            new_tab: link.new_tab,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicPage {
    #[serde(flatten)]
    pub summary: PageSummary,
    pub long_description: Option<String>,
    pub gallery_images: Vec<PublicGalleryImage>,
    pub downloads: Vec<PublicDownload>,
    pub related_links: Vec<PublicRelatedLink>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryPageListing {
    pub category: PublicCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<SubcategoryRef>,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicPageQuery {
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub featured: Option<bool>,
}

/// Active category and subcategory references keyed by id, for nesting into
/// pages. A page filed under anything missing here is not shown publicly.
struct TaxonomyIndex {
    categories: HashMap<i64, CategoryRef>,
    subcategories: HashMap<i64, SubcategoryRef>,
}

impl TaxonomyIndex {
    async fn load(state: &AppState) -> Result<Self> {
        let details = taxonomy::list_categories(&state.db, false).await?;
        let mut index = TaxonomyIndex {
            categories: HashMap::new(),
            subcategories: HashMap::new(),
        };
        for detail in &details {
            index
                .categories
                .insert(detail.category.id, CategoryRef::from(&detail.category));
            for sub in &detail.subcategories {
                index.subcategories.insert(sub.id, SubcategoryRef::from(sub));
            }
        }
        Ok(index)
    }

    fn is_visible(&self, page: &ContentPage) -> bool {
        page.category_id
            .map_or(true, |id| self.categories.contains_key(&id))
            && page
                .subcategory_id
                .map_or(true, |id| self.subcategories.contains_key(&id))
    }

    fn summarize(&self, page: ContentPage) -> PageSummary {
        PageSummary {
            category: page.category_id.and_then(|id| self.categories.get(&id).cloned()),
            subcategory: page
                .subcategory_id
                .and_then(|id| self.subcategories.get(&id).cloned()),
            id: page.id,
            title: page.title,
            slug: page.slug,
            short_description: page.short_description,
            is_featured: page.is_featured,
            creation_date: page.creation_date,
            approval_date: page.approval_date,
        }
    }

    fn expand(&self, page: ContentPageWithChildren) -> PublicPage {
        let long_description = page.page.long_description.clone();
        PublicPage {
            summary: self.summarize(page.page),
            long_description,
            gallery_images: page.gallery_images.into_iter().map(Into::into).collect(),
            downloads: page.downloads.into_iter().map(Into::into).collect(),
            related_links: page.related_links.into_iter().map(Into::into).collect(),
        }
    }
}

async fn published_pages(state: &AppState, filter: PageFilter) -> Result<Vec<PageSummary>> {
    let filter = PageFilter {
        status: Some(ContentStatus::Published),
        ..filter
    };
    let pages = pages::list_pages(&state.db, &filter).await?;
    let index = TaxonomyIndex::load(state).await?;
    Ok(pages
        .into_iter()
        .filter(|p| index.is_visible(p))
        .map(|p| index.summarize(p))
        .collect())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/content/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<PublicCategory>>> {
    let categories = taxonomy::list_categories(&state.db, false).await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /api/content/categories/{*url_path}
/// Resolves `planning` as a category, or `planning/applications` as a
/// subcategory of it when no category owns the full path.
pub async fn category_by_path(
    State(state): State<AppState>,
    AppPath(url_path): AppPath<String>,
) -> Result<Json<CategoryPageListing>> {
    let path = taxonomy::normalize_url_path(&url_path);

    let (category, subcategory_path) = match taxonomy::get_category_by_path(&state.db, &path).await {
        Ok(category) => (category, None),
        Err(AppError::NotFound(msg)) => {
            let (parent, leaf) = path
                .rsplit_once('/')
                .filter(|(parent, _)| !parent.is_empty())
                .ok_or(AppError::NotFound(msg))?;
            let category = taxonomy::get_category_by_path(&state.db, parent).await?;
            (category, Some(format!("/{}", leaf)))
        }
        Err(e) => return Err(e),
    };

    if !category.is_active {
        return Err(AppError::not_found(format!("Category '{}' not found", path)));
    }

    let detail = taxonomy::get_category(&state.db, category.id).await?;
    let subcategory = match subcategory_path {
        Some(sub_path) => Some(
            detail
                .subcategories
                .iter()
                .find(|s| s.is_active && s.url_path == sub_path)
                .map(SubcategoryRef::from)
                .ok_or_else(|| AppError::not_found(format!("Category '{}' not found", path)))?,
        ),
        None => None,
    };

    let pages = published_pages(
        &state,
        PageFilter {
            category_id: Some(category.id),
            subcategory_id: subcategory.as_ref().map(|s| s.id),
            ..PageFilter::default()
        },
    )
    .await?;

    Ok(Json(CategoryPageListing {
        category: detail.into(),
        subcategory,
        pages,
    }))
}

/// GET /api/content/pages
pub async fn list_pages(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PublicPageQuery>,
) -> Result<Json<Vec<PageSummary>>> {
    let pages = published_pages(
        &state,
        PageFilter {
            category_id: query.category_id,
            subcategory_id: query.subcategory_id,
            featured: query.featured,
            ..PageFilter::default()
        },
    )
    .await?;
    Ok(Json(pages))
}

/// GET /api/content/page/{slug}
/// Drafts, archived pages and pages filed under an inactive category or
/// subcategory are indistinguishable from missing ones.
pub async fn page_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<PublicPage>> {
    let page = pages::get_page_by_slug(&state.db, &slug).await?;
    let index = TaxonomyIndex::load(&state).await?;
    if page.page.status != ContentStatus::Published || !index.is_visible(&page.page) {
        return Err(AppError::not_found(format!("Content page '{}' not found", slug)));
    }
    Ok(Json(index.expand(page)))
}
