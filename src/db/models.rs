//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Publication status of a content page. Transitions are unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "Draft",
            ContentStatus::Published => "Published",
            ContentStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown content status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ContentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(ContentStatus::Draft),
            "Published" => Ok(ContentStatus::Published),
            "Archived" => Ok(ContentStatus::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ContentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Category model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub url_path: String,
    pub is_active: bool,
    pub is_predefined: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subcategory model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url_path: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content page model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContentPage {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub is_featured: bool,
    pub creation_date: NaiveDate,
    pub approval_date: Option<NaiveDate>,
    pub last_reviewed: Option<NaiveDate>,
    pub next_review_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gallery image attached to a content page
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub page_id: i64,
    pub image_filename: String,
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// Downloadable file attached to a content page
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Download {
    pub id: i64,
    pub page_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_filename: Option<String>,
    pub sort_order: i64,
}

/// Related link shown alongside a content page
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RelatedLink {
    pub id: i64,
    pub page_id: i64,
    pub title: String,
    pub url: String,
    pub new_tab: bool,
    pub sort_order: i64,
}

/// A content page together with its ordered child collections
#[derive(Debug, Clone, Serialize)]
pub struct ContentPageWithChildren {
    #[serde(flatten)]
    pub page: ContentPage,
    pub gallery_images: Vec<GalleryImage>,
    pub downloads: Vec<Download>,
    pub related_links: Vec<RelatedLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ContentStatus::Draft,
            ContentStatus::Published,
            ContentStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<ContentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!("published".parse::<ContentStatus>().is_err());
        assert!("Deleted".parse::<ContentStatus>().is_err());
    }

    #[test]
    fn test_status_defaults_to_draft() {
        assert_eq!(ContentStatus::default(), ContentStatus::Draft);
        assert_eq!(
            serde_json::to_string(&ContentStatus::Published).unwrap(),
            "\"Published\""
        );
    }
}
