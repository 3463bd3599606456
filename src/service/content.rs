//! Content management service
//!
//! Create/update/delete orchestration for projects and properties:
//! slug generation, HTML sanitization, and cleanup of cover images
//! when the owning row goes away.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{
    ContactMessage, Database, EntityId, ListingStatus, Project, ProjectStatus, Property,
};
use crate::error::AppError;
use crate::storage::MediaStorage;

/// Fields for a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub summary: String,
    pub body_html: String,
    pub location: String,
    pub status: String,
    pub cover_image_key: Option<String>,
    pub published: bool,
}

/// Partial update for a project
///
/// `None` fields are left unchanged. The slug is fixed at creation so
/// published URLs stay stable. `cover_image_key` is doubly optional:
/// the outer level distinguishes "leave alone" from "set", and an
/// inner `None` clears the cover.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_html: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub cover_image_key: Option<Option<String>>,
    pub published: Option<bool>,
}

/// Fields for a new property listing
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub summary: String,
    pub body_html: String,
    pub address: String,
    pub price_cents: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub area_sqm: i64,
    pub listing_status: String,
    pub cover_image_key: Option<String>,
    pub published: bool,
}

/// Partial update for a property listing
///
/// `cover_image_key` follows the same double-`Option` convention as
/// [`ProjectChanges`].
#[derive(Debug, Clone, Default)]
pub struct PropertyChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_html: Option<String>,
    pub address: Option<String>,
    pub price_cents: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub area_sqm: Option<i64>,
    pub listing_status: Option<String>,
    pub cover_image_key: Option<Option<String>>,
    pub published: Option<bool>,
}

/// Content service
pub struct ContentService {
    db: Arc<Database>,
    storage: Arc<MediaStorage>,
}

impl ContentService {
    pub fn new(db: Arc<Database>, storage: Arc<MediaStorage>) -> Self {
        Self { db, storage }
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Create a project from validated input
    pub async fn create_project(&self, input: NewProject) -> Result<Project, AppError> {
        let title = require_text(&input.title, "title")?;
        let status = ProjectStatus::parse(&input.status)
            .ok_or_else(|| AppError::Validation(format!("unknown status: {}", input.status)))?;

        let slug = self.unique_project_slug(&title).await?;
        let now = Utc::now();

        let project = Project {
            id: EntityId::new().0,
            title,
            slug,
            summary: input.summary.trim().to_string(),
            body_html: sanitize_html(&input.body_html),
            location: input.location.trim().to_string(),
            status: status.as_str().to_string(),
            cover_image_key: input.cover_image_key,
            published: input.published,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_project(&project).await?;
        tracing::info!(slug = %project.slug, "Project created");

        Ok(project)
    }

    /// Apply a partial update to a project
    pub async fn update_project(
        &self,
        id: &str,
        changes: ProjectChanges,
    ) -> Result<Project, AppError> {
        let mut project = self.db.get_project(id).await?.ok_or(AppError::NotFound)?;
        let previous_cover = project.cover_image_key.clone();

        if let Some(title) = changes.title {
            project.title = require_text(&title, "title")?;
        }
        if let Some(summary) = changes.summary {
            project.summary = summary.trim().to_string();
        }
        if let Some(body_html) = changes.body_html {
            project.body_html = sanitize_html(&body_html);
        }
        if let Some(location) = changes.location {
            project.location = location.trim().to_string();
        }
        if let Some(status) = changes.status {
            let parsed = ProjectStatus::parse(&status)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {status}")))?;
            project.status = parsed.as_str().to_string();
        }
        if let Some(cover_image_key) = changes.cover_image_key {
            project.cover_image_key = cover_image_key;
        }
        if let Some(published) = changes.published {
            project.published = published;
        }
        project.updated_at = Utc::now();

        self.db.update_project(&project).await?;

        if let Some(old_key) = previous_cover {
            if project.cover_image_key.as_deref() != Some(old_key.as_str()) {
                self.delete_stored_image(&old_key).await;
            }
        }

        Ok(project)
    }

    /// Delete a project and its cover image
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let project = self.db.get_project(id).await?.ok_or(AppError::NotFound)?;

        if !self.db.delete_project(id).await? {
            return Err(AppError::NotFound);
        }

        if let Some(key) = project.cover_image_key {
            self.delete_stored_image(&key).await;
        }

        tracing::info!(slug = %project.slug, "Project deleted");
        Ok(())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Create a property listing from validated input
    pub async fn create_property(&self, input: NewProperty) -> Result<Property, AppError> {
        let title = require_text(&input.title, "title")?;
        let listing_status = ListingStatus::parse(&input.listing_status).ok_or_else(|| {
            AppError::Validation(format!("unknown listing_status: {}", input.listing_status))
        })?;
        validate_non_negative(input.price_cents, "price_cents")?;
        validate_non_negative(input.bedrooms, "bedrooms")?;
        validate_non_negative(input.bathrooms, "bathrooms")?;
        validate_non_negative(input.area_sqm, "area_sqm")?;

        let slug = self.unique_property_slug(&title).await?;
        let now = Utc::now();

        let property = Property {
            id: EntityId::new().0,
            title,
            slug,
            summary: input.summary.trim().to_string(),
            body_html: sanitize_html(&input.body_html),
            address: input.address.trim().to_string(),
            price_cents: input.price_cents,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            area_sqm: input.area_sqm,
            listing_status: listing_status.as_str().to_string(),
            cover_image_key: input.cover_image_key,
            published: input.published,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_property(&property).await?;
        tracing::info!(slug = %property.slug, "Property created");

        Ok(property)
    }

    /// Apply a partial update to a property listing
    pub async fn update_property(
        &self,
        id: &str,
        changes: PropertyChanges,
    ) -> Result<Property, AppError> {
        let mut property = self.db.get_property(id).await?.ok_or(AppError::NotFound)?;
        let previous_cover = property.cover_image_key.clone();

        if let Some(title) = changes.title {
            property.title = require_text(&title, "title")?;
        }
        if let Some(summary) = changes.summary {
            property.summary = summary.trim().to_string();
        }
        if let Some(body_html) = changes.body_html {
            property.body_html = sanitize_html(&body_html);
        }
        if let Some(address) = changes.address {
            property.address = address.trim().to_string();
        }
        if let Some(price_cents) = changes.price_cents {
            validate_non_negative(price_cents, "price_cents")?;
            property.price_cents = price_cents;
        }
        if let Some(bedrooms) = changes.bedrooms {
            validate_non_negative(bedrooms, "bedrooms")?;
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = changes.bathrooms {
            validate_non_negative(bathrooms, "bathrooms")?;
            property.bathrooms = bathrooms;
        }
        if let Some(area_sqm) = changes.area_sqm {
            validate_non_negative(area_sqm, "area_sqm")?;
            property.area_sqm = area_sqm;
        }
        if let Some(listing_status) = changes.listing_status {
            let parsed = ListingStatus::parse(&listing_status).ok_or_else(|| {
                AppError::Validation(format!("unknown listing_status: {listing_status}"))
            })?;
            property.listing_status = parsed.as_str().to_string();
        }
        if let Some(cover_image_key) = changes.cover_image_key {
            property.cover_image_key = cover_image_key;
        }
        if let Some(published) = changes.published {
            property.published = published;
        }
        property.updated_at = Utc::now();

        self.db.update_property(&property).await?;

        if let Some(old_key) = previous_cover {
            if property.cover_image_key.as_deref() != Some(old_key.as_str()) {
                self.delete_stored_image(&old_key).await;
            }
        }

        Ok(property)
    }

    /// Delete a property listing and its cover image
    pub async fn delete_property(&self, id: &str) -> Result<(), AppError> {
        let property = self.db.get_property(id).await?.ok_or(AppError::NotFound)?;

        if !self.db.delete_property(id).await? {
            return Err(AppError::NotFound);
        }

        if let Some(key) = property.cover_image_key {
            self.delete_stored_image(&key).await;
        }

        tracing::info!(slug = %property.slug, "Property deleted");
        Ok(())
    }

    // =========================================================================
    // Contact form
    // =========================================================================

    /// Store a contact form submission after validation
    pub async fn submit_contact(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
        message: &str,
    ) -> Result<ContactMessage, AppError> {
        let name = require_text(name, "name")?;
        let message = require_text(message, "message")?;

        let email = email.trim().to_string();
        if !looks_like_email(&email) {
            return Err(AppError::Validation(
                "email must be a valid address".to_string(),
            ));
        }

        let record = ContactMessage {
            id: EntityId::new().0,
            name,
            email,
            phone: phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            message,
            read: false,
            created_at: Utc::now(),
        };

        self.db.insert_contact_message(&record).await?;
        tracing::info!(email = %record.email, "Contact message stored");

        Ok(record)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn unique_project_slug(&self, title: &str) -> Result<String, AppError> {
        let base = slugify(title);
        if !self.db.project_slug_exists(&base).await? {
            return Ok(base);
        }

        for n in 2u32.. {
            let candidate = format!("{base}-{n}");
            if !self.db.project_slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        unreachable!("slug candidate space is unbounded")
    }

    async fn unique_property_slug(&self, title: &str) -> Result<String, AppError> {
        let base = slugify(title);
        if !self.db.property_slug_exists(&base).await? {
            return Ok(base);
        }

        for n in 2u32.. {
            let candidate = format!("{base}-{n}");
            if !self.db.property_slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        unreachable!("slug candidate space is unbounded")
    }

    /// Best-effort removal from the media host. A stale object in the
    /// bucket must not block a content delete. The media-library row
    /// for the key goes with it so the library never lists objects
    /// that are gone from the bucket.
    async fn delete_stored_image(&self, key: &str) {
        if let Err(error) = self.storage.delete(key).await {
            tracing::warn!(%error, key, "Failed to delete stored image");
        }
        if let Err(error) = self.db.delete_image_asset_by_key(key).await {
            tracing::warn!(%error, key, "Failed to drop image asset row");
        }
    }

    // =========================================================================
    // Media library
    // =========================================================================

    /// Remove a media-library asset
    ///
    /// Detaches any project or property cover referencing the asset
    /// first so published pages never point at a deleted object, then
    /// drops the metadata row. Removal from the media host itself is
    /// best-effort.
    pub async fn delete_media_asset(&self, id: &str) -> Result<(), AppError> {
        let asset = self.db.get_image_asset(id).await?.ok_or(AppError::NotFound)?;

        self.db
            .clear_cover_image_references(&asset.storage_key)
            .await?;
        self.db.delete_image_asset(id).await?;

        if let Err(error) = self.storage.delete(&asset.storage_key).await {
            tracing::warn!(%error, key = %asset.storage_key, "Failed to delete stored image");
        }

        tracing::info!(key = %asset.storage_key, "Media asset deleted");
        Ok(())
    }
}

/// Derive a URL slug from a title
///
/// Lowercases, maps runs of non-alphanumeric characters to single
/// hyphens, trims leading/trailing hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        // Titles made entirely of punctuation still need a slug
        EntityId::new().0.to_ascii_lowercase()
    } else {
        slug
    }
}

/// Strip scripts and event handlers from admin-supplied HTML
fn sanitize_html(raw: &str) -> String {
    ammonia::clean(raw)
}

fn require_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_non_negative(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
