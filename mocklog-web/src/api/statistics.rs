//! Per-chapter performance statistics

use axum::{extract::State, Json};
use mocklog_common::db::records::load_all_records;
use mocklog_common::stats::{compute, ChapterStats};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_questions: usize,
    pub chapters: Vec<ChapterStats>,
}

/// GET /api/statistics
///
/// Recomputed from the full record set on every call.
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<Json<StatisticsResponse>> {
    let records = load_all_records(&state.db).await?;

    Ok(Json(StatisticsResponse {
        total_questions: records.len(),
        chapters: compute(&records),
    }))
}
