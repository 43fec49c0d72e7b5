//! Database models
//!
//! Rust structs representing stored entities. The same shapes are used
//! for the local SQLite tables and the hosted REST tables, so all models
//! derive both `FromRow` and serde.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Reading lifecycle stage of a tracked book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum BookStatus {
    Reading,
    Read,
    WantToRead,
}

impl BookStatus {
    /// Bookshelf tab order
    pub const ALL: [BookStatus; 3] = [
        BookStatus::Read,
        BookStatus::Reading,
        BookStatus::WantToRead,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Read => "read",
            Self::WantToRead => "want-to-read",
        }
    }

    /// Human label used on tabs and badges
    pub fn label(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Read => "Read",
            Self::WantToRead => "Want to Read",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            "want-to-read" => Ok(Self::WantToRead),
            other => Err(crate::error::AppError::Validation(format!(
                "Unknown status: {} (expected reading, read or want-to-read)",
                other
            ))),
        }
    }
}

/// A tracked book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub pages: Option<i32>,
    pub date_read: Option<NaiveDate>,
    /// 1-5 stars
    pub rating: Option<i32>,
    pub review: Option<String>,
    /// Rows written by older clients may have no status
    pub status: Option<BookStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub pages: Option<i32>,
    pub date_read: Option<NaiveDate>,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub status: BookStatus,
}

impl NewBook {
    /// A bare book with only the required fields set
    pub fn new(title: impl Into<String>, author: impl Into<String>, status: BookStatus) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover_url: None,
            isbn: None,
            genre: None,
            pages: None,
            date_read: None,
            rating: None,
            review: None,
            status,
        }
    }
}

/// A reading journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub book_id: Option<String>,
    pub title: String,
    /// Visible text, possibly followed by the sticker trailer
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub book_id: Option<String>,
    pub title: String,
    pub content: String,
}

/// Update payload for a journal entry; every field is rewritten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    pub book_id: Option<String>,
    pub title: String,
    pub content: String,
}

/// Local account row
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&BookStatus::WantToRead).unwrap(),
            r#""want-to-read""#
        );
        let parsed: BookStatus = serde_json::from_str(r#""reading""#).unwrap();
        assert_eq!(parsed, BookStatus::Reading);
        assert!(serde_json::from_str::<BookStatus>(r#""finished""#).is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("read".parse::<BookStatus>().unwrap(), BookStatus::Read);
        assert!("Read".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_book_decodes_remote_row() {
        let row = r#"{
            "id": "7c1e",
            "user_id": "u1",
            "title": "Piranesi",
            "author": "Susanna Clarke",
            "cover_url": null,
            "isbn": "9781635575637",
            "genre": "Fantasy",
            "pages": 272,
            "date_read": "2024-03-02",
            "rating": 5,
            "review": null,
            "status": "read",
            "created_at": "2024-03-02T10:11:12.345678+00:00",
            "updated_at": "2024-03-02T10:11:12.345678+00:00"
        }"#;

        let book: Book = serde_json::from_str(row).unwrap();
        assert_eq!(book.status, Some(BookStatus::Read));
        assert_eq!(book.date_read, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(book.rating, Some(5));
    }
}
