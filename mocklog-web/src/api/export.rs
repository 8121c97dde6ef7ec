//! CSV export of all stored records

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use mocklog_common::db::records::load_all_records;
use mocklog_common::export::records_to_csv;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const EXPORT_FILENAME: &str = "mock_test_log.csv";

/// GET /api/export
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let records = load_all_records(&state.db).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound("No records to export".to_string()));
    }

    let body = records_to_csv(&records)?;
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
