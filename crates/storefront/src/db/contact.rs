//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshmarket_core::{ContactMessageId, ContactSubject, Email};

use super::RepositoryError;
use crate::models::contact::{ContactMessage, NewContactMessage};

/// Internal row type for contact message queries.
#[derive(Debug, sqlx::FromRow)]
struct ContactMessageRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactMessageRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactMessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let subject = ContactSubject::from_name(&row.subject).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown contact subject: {}", row.subject))
        })?;

        Ok(Self {
            id: ContactMessageId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            subject,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact messages.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a validated contact message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &NewContactMessage,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r"
            INSERT INTO contact_messages (first_name, last_name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, subject, message, created_at
            ",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(input.subject.as_str())
        .bind(&input.message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
