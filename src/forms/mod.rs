//! Contact form handling
//!
//! A submission is validated locally, then forwarded to Gravity Forms.
//! Upstream trouble never reaches the visitor: the proxy logs it and still
//! answers that the message was received.

mod gravity;

pub use gravity::{FormsBackend, FormsError, GravityForms};

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::FormsConfig;

/// Reply when the forms backend accepted the submission
pub const SENT_MESSAGE: &str = "Your message has been sent successfully!";

/// Reply when the forms backend failed and the submission was only logged
pub const RECEIVED_MESSAGE: &str = "Your message has been received. We will get back to you soon!";

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Contact form submission as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Submission rejected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Read a loosely typed form field: strings as-is, other scalars in their
/// JSON spelling; `null` and `false` count as missing
fn coerce(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ContactSubmission {
    /// Build a submission from any JSON body
    ///
    /// Field types are not enforced here; anything that is not an object
    /// simply has no fields and fails [`validate`](Self::validate).
    pub fn from_json(body: &Value) -> Self {
        Self {
            name: coerce(body.get("name")),
            email: coerce(body.get("email")),
            subject: coerce(body.get("subject")),
            message: coerce(body.get("message")),
        }
    }

    /// Check required fields and email shape
    pub fn validate(self) -> Result<ValidSubmission, ValidationError> {
        let (Some(name), Some(email), Some(message)) = (
            present(self.name),
            present(self.email),
            present(self.message),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ValidSubmission {
            name,
            email,
            subject: present(self.subject),
            message,
        })
    }
}

/// Loose shape check: something, `@`, something, `.`, something
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Body of a contact form reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    pub success: bool,
    pub message: String,
}

impl ContactReply {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Forwards validated submissions to the forms backend
#[derive(Clone)]
pub struct ContactProxy {
    backend: Arc<dyn FormsBackend>,
    config: FormsConfig,
}

impl ContactProxy {
    pub fn new(backend: Arc<dyn FormsBackend>, config: FormsConfig) -> Self {
        Self { backend, config }
    }

    /// Map a submission onto the configured Gravity Forms input ids
    pub fn payload(&self, submission: &ValidSubmission) -> IndexMap<String, String> {
        let fields = &self.config.fields;
        let subject = submission
            .subject
            .clone()
            .unwrap_or_else(|| self.config.default_subject.clone());

        let mut payload = IndexMap::new();
        payload.insert(fields.name.clone(), submission.name.clone());
        payload.insert(fields.email.clone(), submission.email.clone());
        payload.insert(fields.subject.clone(), subject);
        payload.insert(fields.message.clone(), submission.message.clone());
        payload
    }

    /// Forward a submission
    ///
    /// Always succeeds: an upstream failure is logged together with the
    /// submission and answered with [`RECEIVED_MESSAGE`].
    pub async fn submit(&self, submission: &ValidSubmission) -> ContactReply {
        let payload = self.payload(submission);

        match self.backend.submit(self.config.form_id, &payload).await {
            Ok(()) => {
                tracing::info!("Contact form forwarded to form {}", self.config.form_id);
                ContactReply::ok(SENT_MESSAGE)
            }
            Err(e) => {
                tracing::error!("Gravity Forms error: {}", e);
                tracing::info!(
                    name = %submission.name,
                    email = %submission.email,
                    subject = ?submission.subject,
                    message = %submission.message,
                    "Contact form submission"
                );
                ContactReply::ok(RECEIVED_MESSAGE)
            }
        }
    }
}

impl std::fmt::Debug for ContactProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactProxy")
            .field("form_id", &self.config.form_id)
            .finish_non_exhaustive()
    }
}
