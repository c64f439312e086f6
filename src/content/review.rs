//! Review scheduling report.
//!
//! Every page is classified against a caller-supplied `today` by its
//! `next_review_date`. Classification is pure; the only database work is
//! loading the candidate rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::cmp::Ordering;

use crate::db::models::ContentStatus;
use crate::error::Result;

/// Widths of the nested "due soon" windows, smallest first.
const DUE_WINDOWS: [(ReviewBucket, i64); 3] = [
    (ReviewBucket::Due7, 7),
    (ReviewBucket::Due14, 14),
    (ReviewBucket::Due30, 30),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewBucket {
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(rename = "due_7")]
    Due7,
    #[serde(rename = "due_14")]
    Due14,
    #[serde(rename = "due_30")]
    Due30,
    #[serde(rename = "no_review_date")]
    NoReviewDate,
}

/// Where a page stands relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    NoReviewDate,
    /// Review date is `days` in the past (always > 0).
    Overdue { days: i64 },
    /// Review date is `days` ahead (0 = today).
    Due { days: i64 },
}

impl ReviewState {
    pub fn classify(next_review_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match next_review_date {
            None => ReviewState::NoReviewDate,
            Some(date) => {
                let days = (date - today).num_days();
                if days < 0 {
                    ReviewState::Overdue { days: -days }
                } else {
                    ReviewState::Due { days }
                }
            }
        }
    }

    /// Signed days until the review date; negative when overdue.
    pub fn days_until(&self) -> Option<i64> {
        match *self {
            ReviewState::NoReviewDate => None,
            ReviewState::Overdue { days } => Some(-days),
            ReviewState::Due { days } => Some(days),
        }
    }

    pub fn is_in(&self, bucket: ReviewBucket) -> bool {
        match (*self, bucket) {
            (ReviewState::NoReviewDate, ReviewBucket::NoReviewDate) => true,
            (ReviewState::Overdue { .. }, ReviewBucket::Overdue) => true,
            (ReviewState::Due { days }, bucket) => DUE_WINDOWS
                .iter()
                .any(|(b, width)| *b == bucket && days <= *width),
            _ => false,
        }
    }

    /// All buckets this state belongs to. Empty for reviews more than 30 days out.
    pub fn memberships(&self) -> Vec<ReviewBucket> {
        [
            ReviewBucket::Overdue,
            ReviewBucket::Due7,
            ReviewBucket::Due14,
            ReviewBucket::Due30,
            ReviewBucket::NoReviewDate,
        ]
        .into_iter()
        .filter(|b| self.is_in(*b))
        .collect()
    }

    pub fn label(&self) -> String {
        fn days_word(n: i64) -> &'static str {
            if n == 1 {
                "day"
            } else {
                "days"
            }
        }

        match *self {
            ReviewState::NoReviewDate => "No review date set".to_string(),
            ReviewState::Overdue { days } => format!("Overdue by {} {}", days, days_word(days)),
            ReviewState::Due { days: 0 } => "Due today".to_string(),
            ReviewState::Due { days } => format!("Due in {} {}", days, days_word(days)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub overdue: usize,
    pub due_7: usize,
    pub due_14: usize,
    pub due_30: usize,
    pub no_review_date: usize,
    pub total: usize,
}

impl BucketCounts {
    fn add(&mut self, state: &ReviewState) {
        self.total += 1;
        for bucket in state.memberships() {
            match bucket {
                ReviewBucket::Overdue => self.overdue += 1,
                ReviewBucket::Due7 => self.due_7 += 1,
                ReviewBucket::Due14 => self.due_14 += 1,
                ReviewBucket::Due30 => self.due_30 += 1,
                ReviewBucket::NoReviewDate => self.no_review_date += 1,
            }
        }
    }
}

/// Listing filters; every set field must match.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReviewQuery {
    pub bucket: Option<ReviewBucket>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub search: Option<String>,
}

impl ReviewQuery {
    fn matches(&self, page: &ReviewCandidate, state: &ReviewState) -> bool {
        if let Some(bucket) = self.bucket {
            if !state.is_in(bucket) {
                return false;
            }
        }
        if self.category_id.is_some() && page.category_id != self.category_id {
            return false;
        }
        if self.subcategory_id.is_some() && page.subcategory_id != self.subcategory_id {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => page
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

/// A page as loaded for the report, with its taxonomy names joined in.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewCandidate {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub subcategory_id: Option<i64>,
    pub subcategory_name: Option<String>,
    pub last_reviewed: Option<NaiveDate>,
    pub next_review_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: ContentStatus,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub subcategory_id: Option<i64>,
    pub subcategory_name: Option<String>,
    pub last_reviewed: Option<NaiveDate>,
    pub next_review_date: Option<NaiveDate>,
    pub days_until_review: Option<i64>,
    pub label: String,
    pub buckets: Vec<ReviewBucket>,
    pub edit_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub today: NaiveDate,
    pub counts: BucketCounts,
    pub filters: ReviewQuery,
    pub pages: Vec<ReviewRow>,
}

pub fn edit_url(page_id: i64) -> String {
    format!("/api/admin/content/pages/{}", page_id)
}

/// Null review dates sort last; ties break on title (case-insensitive) then id.
fn review_order(a: &ReviewCandidate, b: &ReviewCandidate) -> Ordering {
    let by_date = match (a.next_review_date, b.next_review_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Classify, count, filter and sort. Counts cover every page regardless of
/// the query.
pub fn build_report(
    mut pages: Vec<ReviewCandidate>,
    query: ReviewQuery,
    today: NaiveDate,
) -> ReviewReport {
    pages.sort_by(review_order);

    let mut counts = BucketCounts::default();
    let mut rows = Vec::new();

    for page in pages {
        let state = ReviewState::classify(page.next_review_date, today);
        counts.add(&state);

        if !query.matches(&page, &state) {
            continue;
        }

        rows.push(ReviewRow {
            edit_url: edit_url(page.id),
            days_until_review: state.days_until(),
            label: state.label(),
            buckets: state.memberships(),
            id: page.id,
            title: page.title,
            slug: page.slug,
            status: page.status,
            category_id: page.category_id,
            category_name: page.category_name,
            subcategory_id: page.subcategory_id,
            subcategory_name: page.subcategory_name,
            last_reviewed: page.last_reviewed,
            next_review_date: page.next_review_date,
        });
    }

    ReviewReport {
        today,
        counts,
        filters: query,
        pages: rows,
    }
}

pub async fn load_candidates(pool: &SqlitePool) -> Result<Vec<ReviewCandidate>> {
    Ok(sqlx::query_as::<_, ReviewCandidate>(
        r#"
        SELECT p.id, p.title, p.slug, p.status,
               p.category_id, c.name AS category_name,
               p.subcategory_id, s.name AS subcategory_name,
               p.last_reviewed, p.next_review_date
        FROM content_pages p
        LEFT JOIN categories c ON c.id = p.category_id
        LEFT JOIN subcategories s ON s.id = p.subcategory_id
        "#,
    )
    .fetch_all(pool)
    .await?)
}

pub async fn review_report(
    pool: &SqlitePool,
    query: ReviewQuery,
    today: NaiveDate,
) -> Result<ReviewReport> {
    let pages = load_candidates(pool).await?;
    let report = build_report(pages, query, today);
    tracing::debug!(
        today = %report.today,
        total = report.counts.total,
        listed = report.pages.len(),
        "built review report"
    );
    Ok(report)
}
