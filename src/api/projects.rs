//! Public project endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::api::dto::{ProjectResponse, project_to_response};
use crate::error::AppError;

/// GET /api/v1/projects
///
/// Published projects, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let projects = state.db.list_projects(false).await?;

    let responses = projects
        .iter()
        .map(|project| project_to_response(project, &state.storage))
        .collect();

    Ok(Json(responses))
}

/// GET /api/v1/projects/:slug
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = state
        .db
        .get_published_project_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(project_to_response(&project, &state.storage)))
}
