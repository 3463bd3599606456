//! Media storage using Cloudflare R2
//!
//! Handles upload, delete, and URL generation for site images.
//! Files are served via R2 Custom Domain (CDN).

use aws_sdk_s3::Client as S3Client;

use crate::error::AppError;

/// Upload prefixes, one per owning entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Project,
    Property,
    /// General uploads from the admin media library
    Upload,
}

impl ImageKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Property => "properties",
            Self::Upload => "uploads",
        }
    }
}

/// Media storage service
///
/// Uploads images to Cloudflare R2 and returns public URLs.
pub struct MediaStorage {
    /// S3-compatible client for R2
    client: S3Client,
    /// Media bucket name
    bucket: String,
    /// Public URL base (Custom Domain)
    /// e.g., "https://media.example-builders.com"
    public_url: String,
}

impl MediaStorage {
    /// Create new media storage client
    ///
    /// # Arguments
    /// * `config` - Storage configuration
    /// * `cloudflare` - Cloudflare credentials
    ///
    /// # Errors
    /// Returns error if S3 client initialization fails
    pub async fn new(
        config: &crate::config::MediaStorageConfig,
        cloudflare: &crate::config::CloudflareConfig,
    ) -> Result<Self, AppError> {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        // R2 endpoint: https://{account_id}.r2.cloudflarestorage.com
        let endpoint = format!("https://{}.r2.cloudflarestorage.com", cloudflare.account_id);

        // Create credentials
        let credentials = Credentials::new(
            &cloudflare.r2_access_key_id,
            &cloudflare.r2_secret_access_key,
            None,
            None,
            "brickworks-r2",
        );

        // Build S3 config for R2
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .http_client(super::build_r2_http_client())
            .build();

        let client = S3Client::from_conf(s3_config);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            public_url: config.public_url.clone(),
        })
    }

    /// Upload an image
    ///
    /// # Arguments
    /// * `kind` - Owning entity kind, selects the key prefix
    /// * `id` - Unique identifier for the file
    /// * `data` - File contents
    /// * `content_type` - MIME type
    ///
    /// # Returns
    /// (Storage key, Public URL)
    ///
    /// # Example
    /// ```ignore
    /// let (key, url) = storage
    ///     .upload_image(ImageKind::Project, "abc123", image_data, "image/webp")
    ///     .await?;
    /// // key: projects/abc123.webp
    /// // url: https://media.example-builders.com/projects/abc123.webp
    /// ```
    pub async fn upload_image(
        &self,
        kind: ImageKind,
        id: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(String, String), AppError> {
        let ext = extension_for(content_type)?;
        let key = format!("{}/{}.{}", kind.prefix(), id, ext);
        let url = self.upload(&key, data, content_type).await?;
        Ok((key, url))
    }

    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        use aws_sdk_s3::primitives::ByteStream;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("public, max-age=31536000") // 1 year
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("R2 upload failed: {}", e)))?;

        Ok(self.get_public_url(key))
    }

    /// Delete a stored image
    ///
    /// # Arguments
    /// * `key` - Storage key to delete
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("R2 delete failed: {}", e)))?;

        Ok(())
    }

    /// Get public URL for a storage key
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }
}

/// Map an accepted image MIME type to a file extension
///
/// Anything outside the allow-list is rejected before it reaches the
/// bucket.
fn extension_for(content_type: &str) -> Result<&'static str, AppError> {
    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        "image/gif" => Ok("gif"),
        other => Err(AppError::Validation(format!(
            "unsupported image content type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list() {
        assert_eq!(extension_for("image/webp").unwrap(), "webp");
        assert_eq!(extension_for("image/jpeg").unwrap(), "jpg");
        assert!(extension_for("video/mp4").is_err());
        assert!(extension_for("application/octet-stream").is_err());
    }

    #[test]
    fn kind_prefixes() {
        assert_eq!(ImageKind::Project.prefix(), "projects");
        assert_eq!(ImageKind::Property.prefix(), "properties");
        assert_eq!(ImageKind::Upload.prefix(), "uploads");
    }
}
