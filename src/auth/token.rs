//! Session token codec
//!
//! Signed, stateless session credentials (JWT, HS256). The token itself
//! is the only session state; there is no server-side session table.
//! The trade-off is that individual sessions cannot be revoked before
//! expiry, which is acceptable for a single-admin marketing site.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authenticated identity carried by a session token
///
/// Only ever constructed from a previously authenticated login;
/// immutable once signed into a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User identifier
    pub id: String,
    /// Login email
    pub email: String,
}

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Subject (user ID)
    sub: String,
    /// Login email
    email: String,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

/// Create a signed session token
///
/// # Arguments
/// * `user` - Identity to embed; `id` and `email` must be non-empty
/// * `secret` - HMAC secret key (validated at startup)
/// * `max_age_secs` - Validity window from issuance (default config: 7 days)
///
/// # Errors
/// Returns error for an empty identity or if encoding fails.
pub fn issue_session_token(
    user: &SessionUser,
    secret: &str,
    max_age_secs: i64,
) -> Result<String, AppError> {
    if user.id.is_empty() || user.email.is_empty() {
        return Err(AppError::Validation(
            "session identity must have id and email".to_string(),
        ));
    }

    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(max_age_secs)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

/// Verify and decode a session token
///
/// Returns the embedded identity, or `None` for any failure: bad
/// signature, malformed token, expired token, wrong algorithm.
/// Verification failures are expected and recoverable; they never
/// surface as errors at this layer.
pub fn verify_session_token(token: &str, secret: &str) -> Option<SessionUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;

    Some(SessionUser {
        id: data.claims.sub,
        email: data.claims.email,
    })
}

/// SHA-256 hex digest of a password
///
/// The admin password is stored in configuration as this digest,
/// never in plaintext.
pub fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
