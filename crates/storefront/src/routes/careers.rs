//! Careers route handlers: open positions and job applications.

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};
use grab_eat_core::FieldErrors;
use grab_eat_core::forms::{JobApplicationForm, MAX_RESUME_BYTES, POSITIONS, Resume, ResumeError};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::contact::FormResponse;
use crate::state::AppState;

/// Request body limit for applications: room for a resume just over the
/// accepted size, so oversized files get a field error instead of a 413.
pub const APPLICATION_BODY_LIMIT: usize = 2 * MAX_RESUME_BYTES;

/// Shown after the application was accepted.
pub const APPLICATION_SENT_MESSAGE: &str =
    "Thank you for your application! We'll review it and get back to you soon.";

/// List open positions.
///
/// GET /api/careers/positions
pub async fn positions() -> Json<&'static [&'static str]> {
    Json(POSITIONS)
}

/// Submit a job application.
///
/// POST /api/careers/apply (multipart/form-data)
///
/// Text fields use the camelCase names of the form; the resume is the
/// optional `resume` file part and must be a PDF under 5 MB.
#[instrument(skip_all)]
pub async fn apply(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FormResponse>> {
    let mut form = JobApplicationForm::default();
    let mut resume_error = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "resume" => match read_resume(field).await? {
                Some(Ok(resume)) => form.resume = Some(resume),
                Some(Err(e)) => resume_error = Some(e),
                None => {}
            },
            "firstName" => form.first_name = text(field).await?,
            "lastName" => form.last_name = text(field).await?,
            "email" => form.email = text(field).await?,
            "phone" => form.phone = text(field).await?,
            "position" => form.position = text(field).await?,
            "experience" => form.experience = Some(text(field).await?),
            "coverLetter" => form.cover_letter = Some(text(field).await?),
            other => tracing::debug!(field = other, "Ignoring unknown application field"),
        }
    }

    let application = match (form.validate(), resume_error) {
        (Ok(application), None) => application,
        (Ok(_), Some(e)) => {
            let mut errors = FieldErrors::new();
            errors.add("resume", e.to_string());
            return Err(AppError::Validation(errors));
        }
        (Err(mut errors), Some(e)) => {
            errors.add("resume", e.to_string());
            return Err(AppError::Validation(errors));
        }
        (Err(errors), None) => return Err(AppError::Validation(errors)),
    };

    state.api().submit_job_application(&application).await?;

    add_breadcrumb(
        "careers",
        "Job application sent",
        Some(&[("position", application.position.as_str())]),
    );

    Ok(Json(FormResponse {
        status: "success",
        message: APPLICATION_SENT_MESSAGE,
    }))
}

async fn text(field: Field<'_>) -> Result<String> {
    field.text().await.map_err(bad_upload)
}

/// Read the resume part. An empty part means no file was chosen.
async fn read_resume(
    field: Field<'_>,
) -> Result<Option<std::result::Result<Resume, ResumeError>>> {
    let file_name = field.file_name().unwrap_or("resume.pdf").to_owned();
    let content_type = field.content_type().unwrap_or_default().to_owned();
    let bytes = field.bytes().await.map_err(bad_upload)?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Resume::from_upload(file_name, &content_type, bytes.to_vec())))
}

fn bad_upload(e: axum::extract::multipart::MultipartError) -> AppError {
    tracing::warn!(error = %e, "Malformed application upload");
    AppError::BadRequest("Could not read the application form".to_string())
}
