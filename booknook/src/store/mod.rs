//! Backend seams
//!
//! The application never talks to storage directly. Books and journal
//! entries go through [`BookStore`], accounts through [`AuthProvider`],
//! and recommendations through [`RecommendationFunction`]. Two backends
//! implement them:
//! - [`LocalStore`]: SQLite in the data directory
//! - [`SupabaseClient`]: the hosted backend-as-a-service over HTTP

pub mod local;
pub mod supabase;

pub use local::LocalStore;
pub use supabase::{HttpRecommendationFunction, SupabaseClient};

use crate::database::{Book, BookStatus, JournalEntry, JournalEntryUpdate, NewBook, NewJournalEntry};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user's session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Name to greet the user with
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Result of registering an account
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is usable immediately
    SignedIn(Session),
    /// The platform sent a confirmation email first
    ConfirmationRequired { email: String },
}

/// One recommendation as returned by the remote function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecommendation {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub reason: String,
}

/// Table-style storage of a user's books and journal entries
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All of the user's books, newest first
    async fn list_books(&self, session: &Session) -> Result<Vec<Book>>;

    async fn insert_book(&self, session: &Session, book: &NewBook) -> Result<Book>;

    async fn delete_book(&self, session: &Session, id: &str) -> Result<()>;

    async fn update_book_status(
        &self,
        session: &Session,
        id: &str,
        status: BookStatus,
    ) -> Result<Book>;

    /// All of the user's journal entries, newest first
    async fn list_journal_entries(&self, session: &Session) -> Result<Vec<JournalEntry>>;

    async fn count_journal_entries(&self, session: &Session) -> Result<i64>;

    async fn insert_journal_entry(
        &self,
        session: &Session,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry>;

    async fn update_journal_entry(
        &self,
        session: &Session,
        id: &str,
        update: &JournalEntryUpdate,
    ) -> Result<JournalEntry>;

    async fn delete_journal_entry(&self, session: &Session, id: &str) -> Result<()>;
}

/// Account operations
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome>;

    async fn sign_out(&self, session: &Session) -> Result<()>;

    /// Exchange an expired session for a fresh one
    async fn refresh(&self, session: &Session) -> Result<Session>;
}

/// The remote language-model function that turns a prompt into books
#[async_trait]
pub trait RecommendationFunction: Send + Sync {
    async fn invoke(
        &self,
        session: Option<&Session>,
        prompt: &str,
    ) -> Result<Vec<RawRecommendation>>;
}
