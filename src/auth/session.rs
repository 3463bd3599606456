//! Session extraction
//!
//! Bridges the incoming request's `session` cookie to an authenticated
//! identity for downstream handlers. Every request re-derives its state
//! from the cookie alone; nothing persists across requests.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use super::token::{SessionUser, verify_session_token};
use crate::AppState;
use crate::error::AppError;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Derive the session state for a request.
///
/// No cookie, or a cookie that fails verification, is an absent
/// identity, never an error.
fn session_from_headers(headers: &HeaderMap, state: &AppState) -> Option<SessionUser> {
    let token = extract_token_from_headers(headers)?;
    verify_session_token(&token, &state.config.auth.session_secret)
}

/// Middleware to require authentication
///
/// Extracts and verifies the session cookie. Adds the identity to
/// request extensions if valid, otherwise responds 401.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/admin/api/...", ...)
///     .layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_from_headers(request.headers(), &state).ok_or(AppError::Unauthorized)?;

    // Add identity to request extensions
    request.extensions_mut().insert(user);

    // Continue to next handler
    Ok(next.run(request).await)
}

/// Extractor for the current authenticated user
///
/// The single enforcement point: handlers performing privileged work
/// take this and fail with 401 when no valid session is present.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SessionUser>().cloned() {
            return Ok(CurrentUser(user));
        }

        let app_state = AppState::from_ref(state);
        let user =
            session_from_headers(&parts.headers, &app_state).ok_or(AppError::Unauthorized)?;
        parts.extensions.insert(user.clone());

        Ok(CurrentUser(user))
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of an error. For
/// anonymous-tolerant endpoints.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SessionUser>().cloned() {
            return Ok(MaybeUser(Some(user)));
        }

        let app_state = AppState::from_ref(state);
        let user = session_from_headers(&parts.headers, &app_state);

        if let Some(user) = &user {
            parts.extensions.insert(user.clone());
        }

        Ok(MaybeUser(user))
    }
}
