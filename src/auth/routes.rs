//! Login and logout routes
//!
//! The only place session tokens are issued. Everything else in the
//! application only reads them back.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};

use super::session::{MaybeUser, SESSION_COOKIE};
use super::token::{SessionUser, hash_password, issue_session_token};
use crate::AppState;
use crate::error::AppError;
use crate::metrics::LOGIN_ATTEMPTS_TOTAL;

/// Create authentication router
///
/// Routes:
/// - POST /admin/login - Exchange credentials for a session cookie
/// - POST /admin/logout - Remove the session cookie
/// - GET /admin/session - Current identity (anonymous-tolerant)
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/session", get(whoami))
}

/// Login request body
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Session state response
#[derive(Debug, Serialize)]
struct SessionResponse {
    authenticated: bool,
    user: Option<SessionUser>,
}

/// POST /admin/login
///
/// Checks the submitted credentials against the configured admin
/// account and, on success, sets the `session` cookie with a freshly
/// signed token. Cookie attributes: HttpOnly, SameSite=Lax, Secure for
/// non-local deployments, Max-Age matching the token lifetime.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let auth = &state.config.auth;

    let email_matches = request.email.trim().eq_ignore_ascii_case(&auth.admin_email);
    let password_matches = hash_password(&request.password) == auth.admin_password_sha256;

    if !email_matches || !password_matches {
        LOGIN_ATTEMPTS_TOTAL.with_label_values(&["failure"]).inc();
        tracing::warn!(email = %request.email, "Rejected admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let user = SessionUser {
        id: "admin".to_string(),
        email: auth.admin_email.clone(),
    };
    let token = issue_session_token(&user, &auth.session_secret, auth.session_max_age)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.should_use_secure_cookies())
        .max_age(time::Duration::seconds(auth.session_max_age))
        .build();

    LOGIN_ATTEMPTS_TOTAL.with_label_values(&["success"]).inc();
    tracing::info!(email = %user.email, "Admin logged in");

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            authenticated: true,
            user: Some(user),
        }),
    ))
}

/// POST /admin/logout
///
/// Removes the session cookie. The token itself stays valid until
/// expiry; there is no server-side revocation.
async fn logout(jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");

    (
        jar.remove(cookie),
        Json(SessionResponse {
            authenticated: false,
            user: None,
        }),
    )
}

/// GET /admin/session
///
/// Reports the identity derived from the request cookie. Anonymous
/// requests get `authenticated: false` with status 200, not 401.
async fn whoami(MaybeUser(user): MaybeUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}
