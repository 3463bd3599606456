//! API response types
//!
//! Wire-format structs returned by the public and admin endpoints,
//! plus converters from database models. Storage keys never leave the
//! backend; responses carry resolved public URLs instead.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{Project, Property};
use crate::storage::MediaStorage;

/// Project as returned by the API
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body_html: String,
    pub location: String,
    pub status: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property listing as returned by the API
#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body_html: String,
    pub address: String,
    pub price_cents: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub area_sqm: i64,
    pub listing_status: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Site metadata for SEO tags and the contact page
#[derive(Debug, Serialize)]
pub struct SiteResponse {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub social_image_url: Option<String>,
    pub project_count: i64,
    pub property_count: i64,
}

/// Convert a project row to its API shape
pub fn project_to_response(project: &Project, storage: &MediaStorage) -> ProjectResponse {
    ProjectResponse {
        id: project.id.clone(),
        title: project.title.clone(),
        slug: project.slug.clone(),
        summary: project.summary.clone(),
        body_html: project.body_html.clone(),
        location: project.location.clone(),
        status: project.status.clone(),
        cover_image_url: project
            .cover_image_key
            .as_deref()
            .map(|key| storage.get_public_url(key)),
        published: project.published,
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

/// Convert a property row to its API shape
pub fn property_to_response(property: &Property, storage: &MediaStorage) -> PropertyResponse {
    PropertyResponse {
        id: property.id.clone(),
        title: property.title.clone(),
        slug: property.slug.clone(),
        summary: property.summary.clone(),
        body_html: property.body_html.clone(),
        address: property.address.clone(),
        price_cents: property.price_cents,
        bedrooms: property.bedrooms,
        bathrooms: property.bathrooms,
        area_sqm: property.area_sqm,
        listing_status: property.listing_status.clone(),
        cover_image_url: property
            .cover_image_key
            .as_deref()
            .map(|key| storage.get_public_url(key)),
        published: property.published,
        created_at: property.created_at,
        updated_at: property.updated_at,
    }
}
