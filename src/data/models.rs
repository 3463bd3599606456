//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Project (construction portfolio)
// =============================================================================

/// A construction project shown on the portfolio pages
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// URL slug, unique across projects
    pub slug: String,
    /// Short plain-text summary for listing cards
    pub summary: String,
    /// Sanitized HTML body
    pub body_html: String,
    /// City or site location
    pub location: String,
    /// Build status: planned, in_progress, completed
    pub status: String,
    /// Storage key of the cover image
    pub cover_image_key: Option<String>,
    /// Only published rows appear on public pages
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project build status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

// =============================================================================
// Property (real-estate listing)
// =============================================================================

/// A property listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: String,
    pub title: String,
    /// URL slug, unique across properties
    pub slug: String,
    /// Short plain-text summary for listing cards
    pub summary: String,
    /// Sanitized HTML body
    pub body_html: String,
    pub address: String,
    /// Asking price in cents to avoid float money
    pub price_cents: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    /// Floor area in square meters
    pub area_sqm: i64,
    /// Listing status: for_sale, for_rent, sold
    pub listing_status: String,
    /// Storage key of the cover image
    pub cover_image_key: Option<String>,
    /// Only published rows appear on public pages
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property listing status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    ForSale,
    ForRent,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForSale => "for_sale",
            Self::ForRent => "for_rent",
            Self::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "for_sale" => Some(Self::ForSale),
            "for_rent" => Some(Self::ForRent),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }
}

// =============================================================================
// Contact messages
// =============================================================================

/// A message submitted through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    /// Whether an admin has seen this
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Uploaded images
// =============================================================================

/// Metadata row for an image uploaded to the media host
///
/// Actual files are stored in Cloudflare R2. This record holds the
/// storage key and public URL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageAsset {
    pub id: String,
    /// Storage key for the image file
    pub storage_key: String,
    /// Public CDN URL
    pub public_url: String,
    /// MIME type (e.g., "image/webp")
    pub content_type: String,
    /// File size in bytes
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}
