//! mocklog-web library - HTTP surface for the mock test log
//!
//! Manual entry, file import, CSV export and per-chapter statistics over a
//! single SQLite record store.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use mocklog_common::{ChapterKeywordTable, ColumnAliasTable};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store connection pool
    pub db: SqlitePool,
    /// Chapter taxonomy used by classification and validation
    pub chapters: Arc<ChapterKeywordTable>,
    /// Header aliases used by import column reconciliation
    pub aliases: Arc<ColumnAliasTable>,
    /// Largest accepted import body, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        chapters: ChapterKeywordTable,
        aliases: ColumnAliasTable,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            chapters: Arc::new(chapters),
            aliases: Arc::new(aliases),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let api = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/options", get(api::get_options))
        .route("/api/classify", get(api::classify_chapter))
        .route(
            "/api/records",
            post(api::create_record).get(api::list_records),
        )
        .route(
            "/api/import",
            post(api::import_upload).layer(upload_limit),
        )
        .route("/api/export", get(api::export_csv))
        .route("/api/statistics", get(api::get_statistics));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
