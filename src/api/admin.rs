//! Admin API
//!
//! Content CRUD, contact inbox, and media uploads. Every route here
//! sits behind the `require_auth` middleware; handlers additionally
//! take `CurrentUser` where the identity matters for logging.

use axum::{
    Json, Router, middleware,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use crate::AppState;
use crate::api::dto::{
    ProjectResponse, PropertyResponse, project_to_response, property_to_response,
};
use crate::auth::{CurrentUser, require_auth};
use crate::data::{ContactMessage, EntityId, ImageAsset};
use crate::error::AppError;
use crate::metrics::{MEDIA_BYTES_UPLOADED, MEDIA_UPLOADS_TOTAL};
use crate::service::{NewProject, NewProperty, ProjectChanges, PropertyChanges};
use crate::storage::ImageKind;

const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the admin API router
///
/// All routes require a valid session.
pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Projects
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            put(update_project).delete(delete_project),
        )
        // Properties
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:id",
            put(update_property).delete(delete_property),
        )
        // Contact inbox
        .route("/messages", get(list_messages))
        .route("/messages/:id/read", post(mark_message_read))
        .route("/messages/:id", delete(delete_message))
        // Media library
        .route("/media", get(list_media).post(upload_media))
        .route("/media/:id", delete(delete_media))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_BYTES + 1024 * 1024))
        .layer(middleware::from_fn_with_state(state, require_auth))
}

// =============================================================================
// Projects
// =============================================================================

/// Create/update request bodies mirror the service input structs; every
/// field of the update variant is optional.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub location: String,
    pub status: String,
    pub cover_image_key: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Distinguishes an omitted `cover_image_key` from an explicit `null`:
/// omitted leaves the cover untouched, `null` clears it.
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_html: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub cover_image_key: Option<Option<String>>,
    pub published: Option<bool>,
}

/// GET /admin/api/projects
///
/// All projects, drafts included.
async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let projects = state.db.list_projects(true).await?;
    let responses = projects
        .iter()
        .map(|project| project_to_response(project, &state.storage))
        .collect();
    Ok(Json(responses))
}

/// POST /admin/api/projects
async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let project = state
        .content
        .create_project(NewProject {
            title: request.title,
            summary: request.summary,
            body_html: request.body_html,
            location: request.location,
            status: request.status,
            cover_image_key: request.cover_image_key,
            published: request.published,
        })
        .await?;

    tracing::debug!(admin = %user.email, slug = %project.slug, "Project created via admin API");

    Ok((
        StatusCode::CREATED,
        Json(project_to_response(&project, &state.storage)),
    ))
}

/// PUT /admin/api/projects/:id
async fn update_project(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = state
        .content
        .update_project(
            &id,
            ProjectChanges {
                title: request.title,
                summary: request.summary,
                body_html: request.body_html,
                location: request.location,
                status: request.status,
                cover_image_key: request.cover_image_key,
                published: request.published,
            },
        )
        .await?;

    Ok(Json(project_to_response(&project, &state.storage)))
}

/// DELETE /admin/api/projects/:id
async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.content.delete_project(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub address: String,
    pub price_cents: i64,
    #[serde(default)]
    pub bedrooms: i64,
    #[serde(default)]
    pub bathrooms: i64,
    #[serde(default)]
    pub area_sqm: i64,
    pub listing_status: String,
    pub cover_image_key: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_html: Option<String>,
    pub address: Option<String>,
    pub price_cents: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub area_sqm: Option<i64>,
    pub listing_status: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub cover_image_key: Option<Option<String>>,
    pub published: Option<bool>,
}

/// GET /admin/api/properties
async fn list_properties(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<PropertyResponse>>, AppError> {
    let properties = state.db.list_properties(true).await?;
    let responses = properties
        .iter()
        .map(|property| property_to_response(property, &state.storage))
        .collect();
    Ok(Json(responses))
}

/// POST /admin/api/properties
async fn create_property(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>), AppError> {
    let property = state
        .content
        .create_property(NewProperty {
            title: request.title,
            summary: request.summary,
            body_html: request.body_html,
            address: request.address,
            price_cents: request.price_cents,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area_sqm: request.area_sqm,
            listing_status: request.listing_status,
            cover_image_key: request.cover_image_key,
            published: request.published,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(property_to_response(&property, &state.storage)),
    ))
}

/// PUT /admin/api/properties/:id
async fn update_property(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePropertyRequest>,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = state
        .content
        .update_property(
            &id,
            PropertyChanges {
                title: request.title,
                summary: request.summary,
                body_html: request.body_html,
                address: request.address,
                price_cents: request.price_cents,
                bedrooms: request.bedrooms,
                bathrooms: request.bathrooms,
                area_sqm: request.area_sqm,
                listing_status: request.listing_status,
                cover_image_key: request.cover_image_key,
                published: request.published,
            },
        )
        .await?;

    Ok(Json(property_to_response(&property, &state.storage)))
}

/// DELETE /admin/api/properties/:id
async fn delete_property(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.content.delete_property(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Contact inbox
// =============================================================================

/// GET /admin/api/messages
async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    Ok(Json(state.db.list_contact_messages().await?))
}

/// POST /admin/api/messages/:id/read
async fn mark_message_read(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.db.mark_message_read(&id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/api/messages/:id
async fn delete_message(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_contact_message(&id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Media library
// =============================================================================

/// GET /admin/api/media
async fn list_media(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<ImageAsset>>, AppError> {
    Ok(Json(state.db.list_image_assets().await?))
}

fn parse_image_kind(value: &str) -> Result<ImageKind, AppError> {
    match value {
        "project" => Ok(ImageKind::Project),
        "property" => Ok(ImageKind::Property),
        "upload" => Ok(ImageKind::Upload),
        other => Err(AppError::Validation(format!(
            "unknown image kind: {other}"
        ))),
    }
}

/// POST /admin/api/media
///
/// Multipart upload: a `file` part with an image content type, plus an
/// optional `kind` part (`project` | `property` | `upload`) that
/// selects the storage prefix. Stores the bytes on the media host and
/// records an `ImageAsset` row.
async fn upload_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageAsset>), AppError> {
    let mut kind = ImageKind::Upload;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid kind field: {e}")))?;
                kind = parse_image_kind(value.trim())?;
            }
            Some("file") => {
                let content_type = field
                    .content_type()
                    .map(ToOwned::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation("file part must declare a content type".to_string())
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid file field: {e}")))?
                    .to_vec();
                file = Some((content_type, data));
            }
            _ => {}
        }
    }

    let (content_type, data) =
        file.ok_or_else(|| AppError::Validation("missing file part".to_string()))?;

    if data.is_empty() {
        return Err(AppError::Validation("file part is empty".to_string()));
    }
    if data.len() > MAX_IMAGE_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "image exceeds maximum size of {} bytes",
            MAX_IMAGE_UPLOAD_BYTES
        )));
    }

    let id = EntityId::new().0;
    let file_size = data.len() as i64;
    let (storage_key, public_url) = state
        .storage
        .upload_image(kind, &id, data, &content_type)
        .await?;

    let asset = ImageAsset {
        id,
        storage_key,
        public_url,
        content_type,
        file_size,
        created_at: chrono::Utc::now(),
    };
    state.db.insert_image_asset(&asset).await?;

    MEDIA_UPLOADS_TOTAL.inc();
    MEDIA_BYTES_UPLOADED.inc_by(file_size as f64);

    tracing::info!(
        admin = %user.email,
        key = %asset.storage_key,
        bytes = file_size,
        "Image uploaded"
    );

    Ok((StatusCode::CREATED, Json(asset)))
}

/// DELETE /admin/api/media/:id
///
/// Detaches cover references, removes the metadata row, then the
/// object itself.
async fn delete_media(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.content.delete_media_asset(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
