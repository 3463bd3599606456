//! Site metadata endpoint

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::dto::SiteResponse;
use crate::error::AppError;

/// GET /api/v1/site
///
/// Company metadata the frontend uses for SEO tags and the contact
/// page, plus published content counts.
pub async fn site(State(state): State<AppState>) -> Result<Json<SiteResponse>, AppError> {
    let site = &state.config.site;

    let project_count = state.db.count_published_projects().await?;
    let property_count = state.db.count_published_properties().await?;

    Ok(Json(SiteResponse {
        title: site.title.clone(),
        description: site.description.clone(),
        base_url: state.config.server.base_url(),
        contact_email: site.contact_email.clone(),
        contact_phone: site.contact_phone.clone(),
        address: site.address.clone(),
        social_image_url: site.social_image_url.clone(),
        project_count,
        property_count,
    }))
}
