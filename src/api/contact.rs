//! Public contact form endpoint

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;
use crate::metrics::CONTACT_MESSAGES_TOTAL;

/// Contact form submission
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String,
}

/// POST /api/v1/contact
///
/// Stores a message from the public contact form. Validation failures
/// come back as 400 with a reason; nothing is emailed from here.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let record = state
        .content
        .submit_contact(
            &request.name,
            &request.email,
            request.phone,
            &request.message,
        )
        .await?;

    CONTACT_MESSAGES_TOTAL.inc();

    Ok((StatusCode::CREATED, Json(ContactResponse { id: record.id })))
}
