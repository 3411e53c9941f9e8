//! Customer-facing forms: field validation, contact messages, and job
//! applications.
//!
//! Validation runs before any network call. Errors are collected per field so
//! the storefront can show each message next to the offending input.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Email;

/// Maximum accepted resume size (5 MiB).
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// The only accepted resume content type.
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";

/// Positions currently open for applications.
pub const POSITIONS: &[&str] = &[
    "Kitchen Helper",
    "Cook",
    "Head Chef",
    "Restaurant Manager",
    "Cashier",
    "Delivery Rider",
    "Server/Waiter",
    "Cleaning Staff",
    "Assistant Manager",
];

/// Per-field validation messages, keyed by the form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .0.len())]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`, keeping the first message per field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Record `message` when `value` is blank. Returns the trimmed value.
    pub fn require<'a>(&mut self, field: &str, value: &'a str, message: &str) -> &'a str {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, message);
        }
        trimmed
    }

    /// Validate a required email field.
    pub fn require_email(&mut self, field: &str, value: &str) -> Option<Email> {
        if value.trim().is_empty() {
            self.add(field, "Email is required");
            return None;
        }
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(_) => {
                self.add(field, "Please enter a valid email");
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when no errors were recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when any field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form input as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact message, shaped for `POST /contact/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every blank or malformed field.
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require("name", &self.name, "Name is required");
        let phone = errors.require("phone", &self.phone, "Phone is required");
        let email = errors.require_email("email", &self.email);
        let subject = errors.require("subject", &self.subject, "Subject is required");
        let message = errors.require("message", &self.message, "Message is required");

        match email {
            Some(email) if errors.is_empty() => Ok(ContactMessage {
                name: name.to_owned(),
                email,
                phone: optional(Some(phone)),
                subject: subject.to_owned(),
                message: message.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Job applications
// =============================================================================

/// Errors validating an uploaded resume.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResumeError {
    #[error("Please upload a PDF file only")]
    NotPdf,
    #[error("File size must be less than 5MB")]
    TooLarge,
}

/// An uploaded resume, already checked for type and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resume {
    file_name: String,
    bytes: Vec<u8>,
}

impl Resume {
    /// Accept an upload if it is a PDF no larger than [`MAX_RESUME_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns [`ResumeError`] for other content types or oversized files.
    pub fn from_upload(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ResumeError> {
        if content_type != RESUME_CONTENT_TYPE {
            return Err(ResumeError::NotPdf);
        }
        if bytes.len() > MAX_RESUME_BYTES {
            return Err(ResumeError::TooLarge);
        }
        Ok(Self {
            file_name: file_name.into(),
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The resume as a `data:` URL, the encoding the API stores.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!(
            "data:{RESUME_CONTENT_TYPE};base64,{}",
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Job application input as typed by the applicant.
#[derive(Debug, Clone, Default)]
pub struct JobApplicationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub experience: Option<String>,
    pub cover_letter: Option<String>,
    pub resume: Option<Resume>,
}

/// A validated job application, shaped for `POST /job-applications/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

impl JobApplicationForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every blank or malformed field.
    pub fn validate(&self) -> Result<JobApplication, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name =
            errors.require("firstName", &self.first_name, "First name is required");
        let last_name = errors.require("lastName", &self.last_name, "Last name is required");
        let email = errors.require_email("email", &self.email);
        let phone = errors.require("phone", &self.phone, "Phone number is required");
        let position = errors.require("position", &self.position, "Position is required");

        match email {
            Some(email) if errors.is_empty() => Ok(JobApplication {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email,
                phone: phone.to_owned(),
                position: position.to_owned(),
                experience: optional(self.experience.as_deref()),
                resume_base64: self.resume.as_ref().map(Resume::data_url),
                cover_letter: optional(self.cover_letter.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}
