//! API layer
//!
//! HTTP handlers for:
//! - Public site endpoints (projects, properties, contact, site metadata)
//! - Admin API (content CRUD, inbox, media)
//! - Metrics (Prometheus)

mod admin;
mod contact;
mod dto;
pub mod metrics;
mod projects;
mod properties;
mod site;

pub use dto::*;

pub use admin::admin_router;
pub use metrics::metrics_router;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Create the public API router
///
/// Everything here is reachable without authentication and only ever
/// sees published content.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/site", get(site::site))
        .route("/projects", get(projects::list_projects))
        .route("/projects/:slug", get(projects::get_project))
        .route("/properties", get(properties::list_properties))
        .route("/properties/:slug", get(properties::get_property))
        .route("/contact", post(contact::submit_contact))
}
