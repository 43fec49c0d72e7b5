//! Error types for Book Nook
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized for JSON output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Journal entry not found: {0}")]
    EntryNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Remote call failed ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_display_string() {
        let err = AppError::Remote {
            status: 401,
            message: "Invalid login credentials".to_string(),
        };

        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#""Remote call failed (401): Invalid login credentials""#);
    }

    #[test]
    fn test_validation_message_is_bare() {
        let err = AppError::Validation("Please enter title and author".to_string());
        assert_eq!(err.to_string(), "Please enter title and author");
    }
}
