//! Contact form route handler.

use axum::{Json, extract::State};
use grab_eat_core::forms::ContactForm;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Shown after the message was accepted.
pub const CONTACT_SENT_MESSAGE: &str = "Thank you for your message. We'll get back to you soon!";

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(state, form), fields(subject = %form.subject))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<FormResponse>> {
    let message = form.validate().map_err(AppError::Validation)?;

    state.api().submit_contact(&message).await?;

    add_breadcrumb("contact", "Contact message sent", None);
    tracing::info!("Contact message submitted");

    Ok(Json(FormResponse {
        status: "success",
        message: CONTACT_SENT_MESSAGE,
    }))
}
