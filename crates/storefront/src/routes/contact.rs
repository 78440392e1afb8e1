//! Contact form handler.

use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use freshmarket_core::ContactMessageId;

use crate::db::ContactRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::models::contact::ContactForm;
use crate::state::AppState;

/// Response after a message is stored.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: &'static str,
    pub id: ContactMessageId,
}

/// Validate and store a contact message. Every invalid field is reported.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<ApiJson<ContactResponse>> {
    let input = form.validate().map_err(AppError::Validation)?;

    let stored = ContactRepository::new(state.pool()).create(&input).await?;
    tracing::info!(
        contact_id = %stored.id,
        subject = stored.subject.as_str(),
        "Contact message received"
    );

    Ok(ApiJson(ContactResponse {
        message: "Message sent successfully",
        id: stored.id,
    }))
}
