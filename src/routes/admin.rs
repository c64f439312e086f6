/**
 * Admin Routes
 * Taxonomy and content page management plus the review report.
 * Every handler here sits behind `auth::require_admin`.
 */
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::content::pages::{self, PageFilter, PageInput};
use crate::content::review::{self, ReviewBucket, ReviewQuery};
use crate::content::taxonomy::{self, CategoryInput, SubcategoryInput};
use crate::error::Result;
use crate::routes::SuccessResponse;
use crate::routes::extract::{AppJson, AppPath, AppQuery};
use crate::AppState;

// ============================================================================
// Categories
// ============================================================================

/// GET /api/admin/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(taxonomy::list_categories(&state.db, true).await?))
}

/// GET /api/admin/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    Ok(Json(taxonomy::get_category(&state.db, id).await?))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<impl IntoResponse> {
    let category = taxonomy::create_category(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<impl IntoResponse> {
    Ok(Json(taxonomy::edit_category(&state.db, id, input).await?))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    taxonomy::delete_category(&state.db, id).await?;
    Ok(Json(SuccessResponse::new("Category deleted")))
}

// ============================================================================
// Subcategories
// ============================================================================

/// POST /api/admin/categories/{id}/subcategories
pub async fn create_subcategory(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
    AppJson(input): AppJson<SubcategoryInput>,
) -> Result<impl IntoResponse> {
    let subcategory = taxonomy::create_subcategory(&state.db, category_id, input).await?;
    Ok((StatusCode::CREATED, Json(subcategory)))
}

/// PUT /api/admin/subcategories/{id}
pub async fn update_subcategory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<SubcategoryInput>,
) -> Result<impl IntoResponse> {
    Ok(Json(taxonomy::edit_subcategory(&state.db, id, input).await?))
}

/// DELETE /api/admin/subcategories/{id}
pub async fn delete_subcategory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    taxonomy::delete_subcategory(&state.db, id).await?;
    Ok(Json(SuccessResponse::new("Subcategory deleted")))
}

// ============================================================================
// Content pages
// ============================================================================

/// GET /api/admin/content/pages
/// All statuses unless `status` is given.
pub async fn list_pages(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<PageFilter>,
) -> Result<impl IntoResponse> {
    Ok(Json(pages::list_pages(&state.db, &filter).await?))
}

/// GET /api/admin/content/pages/{id}
pub async fn get_page(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    Ok(Json(pages::get_page(&state.db, id).await?))
}

/// POST /api/admin/content/pages
pub async fn create_page(
    State(state): State<AppState>,
    AppJson(input): AppJson<PageInput>,
) -> Result<impl IntoResponse> {
    let saved = pages::create_page(&state.db, &state.storage, input).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/admin/content/pages/{id}
/// Full overwrite; child lists are the complete desired collections.
pub async fn update_page(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<PageInput>,
) -> Result<impl IntoResponse> {
    Ok(Json(
        pages::update_page(&state.db, &state.storage, id, input).await?,
    ))
}

/// DELETE /api/admin/content/pages/{id}
pub async fn delete_page(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    Ok(Json(pages::delete_page(&state.db, &state.storage, id).await?))
}

// ============================================================================
// Review report
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ReviewParams {
    pub bucket: Option<ReviewBucket>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub search: Option<String>,
    /// Reference date, `YYYY-MM-DD`; defaults to the current UTC date
    pub today: Option<NaiveDate>,
}

/// GET /api/admin/content/review
pub async fn review_report(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ReviewParams>,
) -> Result<impl IntoResponse> {
    let today = params.today.unwrap_or_else(|| Utc::now().date_naive());
    let query = ReviewQuery {
        bucket: params.bucket,
        category_id: params.category_id,
        subcategory_id: params.subcategory_id,
        search: params.search,
    };
    Ok(Json(review::review_report(&state.db, query, today).await?))
}

#[cfg(test)]
mod tests {
    use crate::create_app;
    use crate::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_category_crud_and_guards() {
        let (state, _dir) = test_state().await;
        let token = admin_token(&state);
        let app = create_app(state);

        let (status, body) = send(
            app.clone(),
            json_request("POST", "/api/admin/categories", Some(&token), &json!({"name": "Allotments"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["url_path"], "/allotments");
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(
            app.clone(),
            json_request(
                "POST",
                "/api/admin/categories",
                Some(&token),
                &json!({"name": "Admin Area", "url_path": "/admin/area"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["message"].as_str().unwrap().contains("reserved"));

        let (status, _) = send(
            app.clone(),
            json_request(
                "POST",
                "/api/admin/content/pages",
                Some(&token),
                &json!({"title": "Plot Rents", "category_id": id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app.clone(),
            json_request("DELETE", &format!("/api/admin/categories/{}", id), Some(&token), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Conflict");
    }

    #[tokio::test]
    async fn test_subcategory_routes() {
        let (state, _dir) = test_state().await;
        let token = admin_token(&state);
        let app = create_app(state);

        let (_, category) = send(
            app.clone(),
            json_request("POST", "/api/admin/categories", Some(&token), &json!({"name": "Halls"})),
        )
        .await;
        let category_id = category["id"].as_i64().unwrap();

        let (status, sub) = send(
            app.clone(),
            json_request(
                "POST",
                &format!("/api/admin/categories/{}/subcategories", category_id),
                Some(&token),
                &json!({"name": "Main Hall"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let sub_id = sub["id"].as_i64().unwrap();

        let (status, body) = send(
            app.clone(),
            json_request(
                "PUT",
                &format!("/api/admin/subcategories/{}", sub_id),
                Some(&token),
                &json!({"name": "Great Hall", "url_path": "great-hall"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url_path"], "/great-hall");

        let (status, _) = send(
            app.clone(),
            json_request(
                "POST",
                "/api/admin/categories/9999/subcategories",
                Some(&token),
                &json!({"name": "Orphan"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            app,
            json_request("DELETE", &format!("/api/admin/subcategories/{}", sub_id), Some(&token), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_page_lifecycle_over_http() {
        let (state, _dir) = test_state().await;
        let token = admin_token(&state);
        let app = create_app(state);

        let (status, created) = send(
            app.clone(),
            json_request(
                "POST",
                "/api/admin/content/pages",
                Some(&token),
                &json!({
                    "title": "Council Tax",
                    "related_links": [
                        {"title": "GOV.UK", "url": "https://www.gov.uk/council-tax", "new_tab": true},
                        {"title": "Contact", "url": "/contact"}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["slug"], "council-tax");
        assert_eq!(created["status"], "Draft");
        let id = created["id"].as_i64().unwrap();
        let keep = created["related_links"][1]["id"].as_i64().unwrap();

        let (status, updated) = send(
            app.clone(),
            json_request(
                "PUT",
                &format!("/api/admin/content/pages/{}", id),
                Some(&token),
                &json!({
                    "title": "Council Tax Bands",
                    "status": "Published",
                    "next_review_date": "2025-01-20",
                    "related_links": [{"id": keep, "title": "Contact us", "url": "/contact"}]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["slug"], "council-tax");
        assert_eq!(updated["related_links"].as_array().unwrap().len(), 1);
        assert_eq!(updated["related_links"][0]["title"], "Contact us");

        let (status, body) = send(
            app.clone(),
            json_request(
                "PUT",
                &format!("/api/admin/content/pages/{}", id),
                Some(&token),
                &json!({"title": "Council Tax", "status": "Pending"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["message"].as_str().unwrap().contains("Pending"));

        let (status, body) = send(
            app.clone(),
            get_request("/api/admin/content/pages/not-a-number", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");

        let (status, body) = send(
            app.clone(),
            get_request("/api/admin/content/pages?status=Published", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, deleted) = send(
            app.clone(),
            json_request("DELETE", &format!("/api/admin/content/pages/{}", id), Some(&token), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["slug"], "council-tax");

        let (status, _) = send(
            app,
            get_request(&format!("/api/admin/content/pages/{}", id), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_review_report_with_reference_date() {
        let (state, _dir) = test_state().await;
        let token = admin_token(&state);
        let app = create_app(state);

        for (title, date) in [
            ("A", json!("2025-01-08")),
            ("B", json!("2025-01-10")),
            ("C", json!(null)),
            ("D", json!("2025-01-20")),
        ] {
            let (status, _) = send(
                app.clone(),
                json_request(
                    "POST",
                    "/api/admin/content/pages",
                    Some(&token),
                    &json!({"title": title, "next_review_date": date}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            app.clone(),
            get_request("/api/admin/content/review?today=2025-01-10", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["overdue"], 1);
        assert_eq!(body["counts"]["due_7"], 1);
        assert_eq!(body["counts"]["due_14"], 2);
        assert_eq!(body["counts"]["no_review_date"], 1);
        let labels: Vec<&str> = body["pages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["label"].as_str().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["Overdue by 2 days", "Due today", "Due in 10 days", "No review date set"]
        );

        let (status, body) = send(
            app.clone(),
            get_request("/api/admin/content/review?today=2025-01-10&bucket=due_14", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pages"].as_array().unwrap().len(), 2);
        assert_eq!(body["counts"]["total"], 4);

        let (status, body) = send(
            app,
            get_request("/api/admin/content/review?bucket=soon", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["message"].is_string());
    }
}
