//! SQLite database operations
//!
//! All database access goes through this module.
//! Uses SQLx with runtime-bound queries and embedded migrations.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    /// * `max_connections` - Pool cap (1 for single-instance deployments)
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path, max_connections: u32) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_string)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Insert a new project row
    pub async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, slug, summary, body_html, location, status,
                 cover_image_key, published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.body_html)
        .bind(&project.location)
        .bind(&project.status)
        .bind(&project.cover_image_key)
        .bind(project.published)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing project row
    pub async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, slug = ?, summary = ?, body_html = ?, location = ?,
                status = ?, cover_image_key = ?, published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.body_html)
        .bind(&project.location)
        .bind(&project.status)
        .bind(&project.cover_image_key)
        .bind(project.published)
        .bind(project.updated_at)
        .bind(&project.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a project by ID (published or not)
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }

    /// Get a published project by slug
    pub async fn get_published_project_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE slug = ? AND published = 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    /// List projects, newest first
    ///
    /// Public pages pass `include_unpublished = false`.
    pub async fn list_projects(&self, include_unpublished: bool) -> Result<Vec<Project>, AppError> {
        let query = if include_unpublished {
            "SELECT * FROM projects ORDER BY created_at DESC"
        } else {
            "SELECT * FROM projects WHERE published = 1 ORDER BY created_at DESC"
        };

        let projects = sqlx::query_as::<_, Project>(query)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    /// Delete a project row, returning whether it existed
    pub async fn delete_project(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a project slug is taken
    pub async fn project_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM projects WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Count published projects
    pub async fn count_published_projects(&self) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE published = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Insert a new property row
    pub async fn insert_property(&self, property: &Property) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO properties
                (id, title, slug, summary, body_html, address, price_cents,
                 bedrooms, bathrooms, area_sqm, listing_status, cover_image_key,
                 published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&property.id)
        .bind(&property.title)
        .bind(&property.slug)
        .bind(&property.summary)
        .bind(&property.body_html)
        .bind(&property.address)
        .bind(property.price_cents)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_sqm)
        .bind(&property.listing_status)
        .bind(&property.cover_image_key)
        .bind(property.published)
        .bind(property.created_at)
        .bind(property.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing property row
    pub async fn update_property(&self, property: &Property) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE properties
            SET title = ?, slug = ?, summary = ?, body_html = ?, address = ?,
                price_cents = ?, bedrooms = ?, bathrooms = ?, area_sqm = ?,
                listing_status = ?, cover_image_key = ?, published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&property.title)
        .bind(&property.slug)
        .bind(&property.summary)
        .bind(&property.body_html)
        .bind(&property.address)
        .bind(property.price_cents)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area_sqm)
        .bind(&property.listing_status)
        .bind(&property.cover_image_key)
        .bind(property.published)
        .bind(property.updated_at)
        .bind(&property.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a property by ID (published or not)
    pub async fn get_property(&self, id: &str) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    /// Get a published property by slug
    pub async fn get_published_property_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE slug = ? AND published = 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    /// List properties, newest first
    ///
    /// Public pages pass `include_unpublished = false`.
    pub async fn list_properties(
        &self,
        include_unpublished: bool,
    ) -> Result<Vec<Property>, AppError> {
        let query = if include_unpublished {
            "SELECT * FROM properties ORDER BY created_at DESC"
        } else {
            "SELECT * FROM properties WHERE published = 1 ORDER BY created_at DESC"
        };

        let properties = sqlx::query_as::<_, Property>(query)
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    /// Delete a property row, returning whether it existed
    pub async fn delete_property(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a property slug is taken
    pub async fn property_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM properties WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Count published properties
    pub async fn count_published_properties(&self) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM properties WHERE published = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Contact messages
    // =========================================================================

    /// Store a contact form submission
    pub async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, phone, message, read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.message)
        .bind(message.read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List contact messages, newest first
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Mark a message as read, returning whether it existed
    pub async fn mark_message_read(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE contact_messages SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a contact message, returning whether it existed
    pub async fn delete_contact_message(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Image assets
    // =========================================================================

    /// Record an uploaded image
    pub async fn insert_image_asset(&self, asset: &ImageAsset) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO image_assets
                (id, storage_key, public_url, content_type, file_size, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&asset.id)
        .bind(&asset.storage_key)
        .bind(&asset.public_url)
        .bind(&asset.content_type)
        .bind(asset.file_size)
        .bind(asset.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an image asset by ID
    pub async fn get_image_asset(&self, id: &str) -> Result<Option<ImageAsset>, AppError> {
        let asset = sqlx::query_as::<_, ImageAsset>("SELECT * FROM image_assets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    /// List image assets, newest first
    pub async fn list_image_assets(&self) -> Result<Vec<ImageAsset>, AppError> {
        let assets = sqlx::query_as::<_, ImageAsset>(
            "SELECT * FROM image_assets ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    /// Delete an image asset row, returning whether it existed
    pub async fn delete_image_asset(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM image_assets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an image asset row by storage key, returning whether it existed
    ///
    /// Used when a cover image is cleaned up through its owning entity,
    /// where only the key is known.
    pub async fn delete_image_asset_by_key(&self, storage_key: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM image_assets WHERE storage_key = ?")
            .bind(storage_key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Null out any project or property cover referencing a storage key
    ///
    /// Keeps published pages from carrying URLs to deleted objects.
    pub async fn clear_cover_image_references(&self, storage_key: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE projects SET cover_image_key = NULL WHERE cover_image_key = ?")
            .bind(storage_key)
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE properties SET cover_image_key = NULL WHERE cover_image_key = ?")
            .bind(storage_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
