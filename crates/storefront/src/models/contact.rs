//! Contact form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshmarket_core::{ContactMessageId, ContactSubject, Email};

use crate::error::FieldError;

/// Minimum length of a contact message body, in characters.
pub const MIN_MESSAGE_LENGTH: usize = 10;

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub subject: ContactSubject,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Raw contact form submission.
///
/// Every field defaults to empty so missing fields surface as field errors
/// instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact message ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub subject: ContactSubject,
    pub message: String,
}

impl ContactForm {
    /// Validate the submission, reporting every invalid field at once.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per invalid field.
    pub fn validate(self) -> Result<NewContactMessage, Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            errors.push(FieldError::new("firstName", "First name is required"));
        }

        let last_name = self.last_name.trim().to_string();
        if last_name.is_empty() {
            errors.push(FieldError::new("lastName", "Last name is required"));
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(FieldError::new("email", "Invalid email address"));
                None
            }
        };

        let subject = ContactSubject::from_name(&self.subject);
        if subject.is_none() {
            errors.push(FieldError::new("subject", "Please select a subject"));
        }

        let message = self.message.trim().to_string();
        if message.chars().count() < MIN_MESSAGE_LENGTH {
            errors.push(FieldError::new(
                "message",
                "Message must be at least 10 characters",
            ));
        }

        match (email, subject) {
            (Some(email), Some(subject)) if errors.is_empty() => Ok(NewContactMessage {
                first_name,
                last_name,
                email,
                subject,
                message,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Ana".to_string(),
            last_name: "Garcia".to_string(),
            email: "Ana@Example.com".to_string(),
            subject: "delivery".to_string(),
            message: "My box arrived a day late.".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let message = valid_form().validate().unwrap();
        assert_eq!(message.email.as_str(), "ana@example.com");
        assert_eq!(message.subject, ContactSubject::Delivery);
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let errors = ContactForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["firstName", "lastName", "email", "subject", "message"]
        );
    }

    #[test]
    fn test_short_message_rejected() {
        let form = ContactForm {
            message: "  too short ".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "message");
    }

    #[test]
    fn test_unknown_subject_rejected() {
        let form = ContactForm {
            subject: "refund".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "subject");
    }

    #[test]
    fn test_bad_email_alone_is_one_error() {
        let form = ContactForm {
            email: "ana.example.com".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[0].message, "Invalid email address");
    }
}
