//! Manual record entry and record listing

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use mocklog_common::db::records::{append_record, load_all_records, load_records_for_test};
use mocklog_common::record::DatePolicy;
use mocklog_common::{Error, Record, RecordDraft};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/records
///
/// Validates a single entry-form submission with strict date parsing and
/// appends it. Every field violation is reported at once.
pub async fn create_record(
    State(state): State<AppState>,
    Json(draft): Json<RecordDraft>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let record = draft
        .validate(&state.chapters, DatePolicy::Strict)
        .map_err(Error::InvalidRecord)?;

    append_record(&state.db, &record).await?;
    info!(
        test_no = record.test_no,
        q_no = record.q_no,
        chapter = %record.chapter,
        "Record added"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Kept as text so a malformed filter can be ignored instead of rejected.
    /// Only plain integers filter; "3.0" is ignored like any other non-integer.
    #[serde(default)]
    pub test_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Filter actually applied, if any
    pub test_no: Option<i64>,
    pub count: usize,
    pub records: Vec<Record>,
}

/// GET /api/records[?test_no=N]
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse>> {
    let filter = params
        .test_no
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok());

    let records = match filter {
        Some(test_no) => load_records_for_test(&state.db, test_no).await?,
        None => load_all_records(&state.db).await?,
    };

    Ok(Json(ListResponse {
        test_no: filter,
        count: records.len(),
        records,
    }))
}
