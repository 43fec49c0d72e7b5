//! Books service
//!
//! Shelf operations for the signed-in user. Payloads are re-validated
//! here so no store call is made for a book that breaks the invariants.

use crate::config::{MAX_RATING, MIN_RATING};
use crate::database::{Book, BookStatus, NewBook};
use crate::error::{AppError, Result};
use crate::services::recommender::Recommendation;
use crate::store::{BookStore, Session};
use std::sync::Arc;

/// Service for managing the bookshelf
#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// All books, newest first
    pub async fn list(&self, session: &Session) -> Result<Vec<Book>> {
        self.store.list_books(session).await
    }

    /// Validate and insert a book
    pub async fn add(&self, session: &Session, book: NewBook) -> Result<Book> {
        validate(&book)?;

        tracing::info!("Adding book: {}", book.title);
        let created = self.store.insert_book(session, &book).await?;
        tracing::info!("Book added: {}", created.id);

        Ok(created)
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<()> {
        tracing::info!("Deleting book: {}", id);
        self.store.delete_book(session, id).await
    }

    pub async fn set_status(
        &self,
        session: &Session,
        id: &str,
        status: BookStatus,
    ) -> Result<Book> {
        tracing::debug!("Setting status of {} to {}", id, status);
        self.store.update_book_status(session, id, status).await
    }

    /// Put a recommended book on the want-to-read list
    pub async fn accept_recommendation(
        &self,
        session: &Session,
        rec: &Recommendation,
    ) -> Result<Book> {
        let mut book = NewBook::new(rec.title.clone(), rec.author.clone(), BookStatus::WantToRead);
        book.cover_url = rec.cover_url.clone().filter(|u| !u.is_empty());
        self.add(session, book).await
    }
}

fn validate(book: &NewBook) -> Result<()> {
    if book.title.trim().is_empty() || book.author.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter title and author".to_string(),
        ));
    }

    if let Some(rating) = book.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
    }

    if let Some(pages) = book.pages {
        if pages <= 0 {
            return Err(AppError::Validation(
                "Pages must be a positive number".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, Repository};
    use crate::store::{AuthProvider, LocalStore, SignUpOutcome};

    async fn create_test_service() -> (BooksService, Session) {
        let pool = create_memory_pool().await.unwrap();
        let store = Arc::new(LocalStore::new(Repository::new(pool)));
        let outcome = store
            .sign_up("reader@example.com", "hunter22", None)
            .await
            .unwrap();
        let SignUpOutcome::SignedIn(session) = outcome else {
            panic!("local sign-up should sign in");
        };
        (BooksService::new(store), session)
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (service, session) = create_test_service().await;

        let mut book = NewBook::new("Piranesi", "Susanna Clarke", BookStatus::Read);
        book.rating = Some(5);
        let created = service.add(&session, book).await.unwrap();

        let books = service.list(&session).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, created.id);
        assert_eq!(books[0].rating, Some(5));
    }

    #[tokio::test]
    async fn test_add_rejects_missing_fields() {
        let (service, session) = create_test_service().await;

        let err = service
            .add(&session, NewBook::new("  ", "Someone", BookStatus::Read))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_rating() {
        let (service, session) = create_test_service().await;

        let mut book = NewBook::new("Title", "Author", BookStatus::Read);
        book.rating = Some(6);
        assert!(service.add(&session, book).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_and_set_status() {
        let (service, session) = create_test_service().await;

        let a = service
            .add(&session, NewBook::new("A", "X", BookStatus::Reading))
            .await
            .unwrap();
        let b = service
            .add(&session, NewBook::new("B", "Y", BookStatus::Reading))
            .await
            .unwrap();

        let updated = service.set_status(&session, &a.id, BookStatus::Read).await.unwrap();
        assert_eq!(updated.status, Some(BookStatus::Read));

        service.delete(&session, &b.id).await.unwrap();
        let books = service.list(&session).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, a.id);
    }

    #[tokio::test]
    async fn test_accept_recommendation() {
        let (service, session) = create_test_service().await;

        let rec = Recommendation {
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            reason: "You rated Earthsea highly".to_string(),
            cover_url: Some("https://covers.openlibrary.org/b/id/1-M.jpg".to_string()),
        };

        let book = service.accept_recommendation(&session, &rec).await.unwrap();
        assert_eq!(book.status, Some(BookStatus::WantToRead));
        assert_eq!(book.rating, None);
        assert_eq!(book.cover_url, rec.cover_url);
    }
}
