//! Repository layer for database operations
//!
//! CRUD operations for accounts, books and journal entries. Every book
//! and entry query is scoped by the owning user's id.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Accounts =====

    /// Create a local account
    pub async fn create_user(
        &self,
        email: &str,
        display_name: Option<&str>,
        password_hash: &str,
    ) -> Result<UserAccount> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(display_name)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created user: {}", id);
        Ok(user)
    }

    /// Find an account by email (case-insensitive)
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    // ===== Books =====

    /// Insert a book for a user
    pub async fn insert_book(&self, user_id: &str, book: &NewBook) -> Result<Book> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                id, user_id, title, author, cover_url, isbn, genre, pages,
                date_read, rating, review, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover_url)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.pages)
        .bind(book.date_read)
        .bind(book.rating)
        .bind(&book.review)
        .bind(book.status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted book: {}", id);
        Ok(created)
    }

    /// Get one of a user's books
    pub async fn get_book(&self, user_id: &str, id: &str) -> Result<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::BookNotFound(id.to_string()))
    }

    /// List a user's books, newest first
    pub async fn list_books(&self, user_id: &str) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Change a book's reading status
    pub async fn update_book_status(
        &self,
        user_id: &str,
        id: &str,
        status: BookStatus,
    ) -> Result<Book> {
        let rows = sqlx::query(
            "UPDATE books SET status = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::BookNotFound(id.to_string()));
        }

        tracing::debug!("Set status of book {} to {}", id, status);
        self.get_book(user_id, id).await
    }

    /// Delete one of a user's books
    pub async fn delete_book(&self, user_id: &str, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM books WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::BookNotFound(id.to_string()));
        }

        tracing::debug!("Deleted book: {}", id);
        Ok(())
    }

    // ===== Journal =====

    /// Insert a journal entry for a user
    pub async fn insert_journal_entry(
        &self,
        user_id: &str,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let created = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (id, user_id, book_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&entry.book_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted journal entry: {}", id);
        Ok(created)
    }

    /// Get one of a user's journal entries
    pub async fn get_journal_entry(&self, user_id: &str, id: &str) -> Result<JournalEntry> {
        sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// List a user's journal entries, newest first
    pub async fn list_journal_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Number of journal entries a user has written
    pub async fn count_journal_entries(&self, user_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM journal_entries WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Rewrite a journal entry's title, content and book link
    pub async fn update_journal_entry(
        &self,
        user_id: &str,
        id: &str,
        update: &JournalEntryUpdate,
    ) -> Result<JournalEntry> {
        let rows = sqlx::query(
            r#"
            UPDATE journal_entries
            SET title = ?, content = ?, book_id = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.book_id)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::EntryNotFound(id.to_string()));
        }

        tracing::debug!("Updated journal entry: {}", id);
        self.get_journal_entry(user_id, id).await
    }

    /// Delete one of a user's journal entries
    pub async fn delete_journal_entry(&self, user_id: &str, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM journal_entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::EntryNotFound(id.to_string()));
        }

        tracing::debug!("Deleted journal entry: {}", id);
        Ok(())
    }
}
