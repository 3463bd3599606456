//! Admin authentication
//!
//! Handles:
//! - Signed session tokens (JWT, HS256)
//! - Session extraction from the `session` cookie
//! - Login/logout routes

mod routes;
mod session;
pub mod token;

pub use routes::auth_router;
pub use session::{CurrentUser, MaybeUser, require_auth};
pub use token::{SessionUser, hash_password, issue_session_token, verify_session_token};
