//! Chapter classification preview

use axum::{
    extract::{Query, State},
    Json,
};
use mocklog_common::{ChapterClassifier, Classification};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyParams {
    #[serde(default)]
    pub chapter: String,
}

/// GET /api/classify?chapter=...
///
/// Shows which canonical chapter a free-text label maps to. Never fails; an
/// unmatched label comes back title-cased with `canonical: false`.
pub async fn classify_chapter(
    State(state): State<AppState>,
    Query(params): Query<ClassifyParams>,
) -> Json<Classification> {
    let classifier = ChapterClassifier::new(&state.chapters);
    Json(classifier.classify_detailed(&params.chapter))
}
