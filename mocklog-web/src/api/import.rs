//! Bulk import of CSV/XLSX uploads

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use mocklog_common::import::{import_file, ImportSummary};
use mocklog_common::Error;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// Original file name; its extension selects the decoder
    pub filename: Option<String>,
}

/// POST /api/import?filename=tests.xlsx
///
/// The request body is the raw file. Rows are appended only if every row
/// validates.
pub async fn import_upload(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ImportSummary>)> {
    let filename = params
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput("filename query parameter is required".to_string()))?;

    if body.is_empty() {
        return Err(Error::InvalidInput("Uploaded file is empty".to_string()).into());
    }

    let summary = import_file(
        &state.db,
        &filename,
        &body,
        &state.chapters,
        &state.aliases,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}
