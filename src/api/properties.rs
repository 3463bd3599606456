//! Public property endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::api::dto::{PropertyResponse, property_to_response};
use crate::error::AppError;

/// GET /api/v1/properties
///
/// Published listings, newest first.
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyResponse>>, AppError> {
    let properties = state.db.list_properties(false).await?;

    let responses = properties
        .iter()
        .map(|property| property_to_response(property, &state.storage))
        .collect();

    Ok(Json(responses))
}

/// GET /api/v1/properties/:slug
pub async fn get_property(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = state
        .db
        .get_published_property_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(property_to_response(&property, &state.storage)))
}
