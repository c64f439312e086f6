//! Council CMS - content management backend for a town council website

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::content::storage::{FileStorage, PUBLIC_PREFIX};

/// Uploads may carry PDFs and photos, so the body cap sits above the
/// per-file limit enforced by the upload handler.
const MAX_REQUEST_BODY: usize = 25 * 1024 * 1024;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: FileStorage,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let storage = FileStorage::new(config.upload_dir.clone());
        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }
}

pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.allowed_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    tracing::info!("CORS configured");

    let admin = Router::new()
        .route("/verify", post(routes::auth::verify_token))
        .route(
            "/categories",
            get(routes::admin::list_categories).post(routes::admin::create_category),
        )
        .route(
            "/categories/{id}",
            get(routes::admin::get_category)
                .put(routes::admin::update_category)
                .delete(routes::admin::delete_category),
        )
        .route(
            "/categories/{id}/subcategories",
            post(routes::admin::create_subcategory),
        )
        .route(
            "/subcategories/{id}",
            put(routes::admin::update_subcategory).delete(routes::admin::delete_subcategory),
        )
        .route(
            "/content/pages",
            get(routes::admin::list_pages).post(routes::admin::create_page),
        )
        .route(
            "/content/pages/{id}",
            get(routes::admin::get_page)
                .put(routes::admin::update_page)
                .delete(routes::admin::delete_page),
        )
        .route("/content/review", get(routes::admin::review_report))
        .route(
            "/uploads",
            post(routes::upload::upload_file).layer(DefaultBodyLimit::max(MAX_REQUEST_BODY)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::require_admin,
        ))
        // Login sits outside the token gate.
        .route("/login", post(routes::auth::login));

    Router::new()
        .route("/api/content/categories", get(routes::public::list_categories))
        .route(
            "/api/content/categories/{*url_path}",
            get(routes::public::category_by_path),
        )
        .route("/api/content/pages", get(routes::public::list_pages))
        .route("/api/content/page/{slug}", get(routes::public::page_by_slug))
        .nest("/api/admin", admin)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.storage.root()))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::default();

    // Guards must outlive the server or buffered log lines are lost.
    let _log_guards = logging::init(&config);

    routes::health::init_start_time();

    config.validate()?;

    let pool = db::init_pool(&config).await?;
    db::run_migrations(&pool).await?;
    db::seed_predefined_categories(&pool).await?;

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::new(pool, config);
    state.storage.ensure_root().await?;

    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
