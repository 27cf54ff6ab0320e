use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::search::filter::{available_skills, filter_by_skills, parse_selection};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub selected: Vec<String>,
    pub total: usize,
    pub candidates: Vec<CandidateRow>,
}

#[derive(Debug, Serialize)]
pub struct SkillOptionsResponse {
    pub skills: Vec<String>,
}

/// GET /api/v1/candidates?skills=a,b&skill=c
///
/// `skills` takes a comma separated list; `skill` takes one tag as-is, so tags
/// containing commas stay selectable.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let selected = parse_selection(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let rows = state.store.scan().await?;
    let candidates = filter_by_skills(rows, &selected);
    Ok(Json(CandidateListResponse {
        selected,
        total: candidates.len(),
        candidates,
    }))
}

/// GET /api/v1/skills
pub async fn handle_skill_options(
    State(state): State<AppState>,
) -> Result<Json<SkillOptionsResponse>, AppError> {
    let rows = state.store.scan().await?;
    Ok(Json(SkillOptionsResponse {
        skills: available_skills(&rows),
    }))
}
