//! Dropdown option lists for the entry form

use axum::{extract::State, Json};
use mocklog_common::{Difficulty, Remark, YesNo};
use serde::Serialize;

use crate::AppState;

/// Allowed values for each constrained record field
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub chapters: Vec<String>,
    pub yes_no: Vec<&'static str>,
    pub difficulties: Vec<&'static str>,
    pub remarks: Vec<&'static str>,
    pub max_q_no: i64,
}

/// GET /api/options
pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        chapters: state
            .chapters
            .chapter_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        yes_no: YesNo::ALL.iter().map(|v| v.as_str()).collect(),
        difficulties: Difficulty::ALL.iter().map(|v| v.as_str()).collect(),
        remarks: Remark::ALL.iter().map(|v| v.as_str()).collect(),
        max_q_no: mocklog_common::record::MAX_Q_NO,
    })
}
