//! Journal service
//!
//! Entries are saved with their stickers folded into the content, so the
//! stores only ever see plain text columns.

use crate::database::{JournalEntry, JournalEntryUpdate, NewJournalEntry};
use crate::error::{AppError, Result};
use crate::stickers::encode_content;
use crate::store::{BookStore, Session};
use std::sync::Arc;

/// An entry as composed in the editor, before encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub title: String,
    pub text: String,
    pub book_id: Option<String>,
    pub stickers: Vec<String>,
}

impl JournalDraft {
    fn check(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.text.trim().is_empty() {
            return Err(AppError::Validation(
                "Please fill in the title and your thoughts!".to_string(),
            ));
        }
        Ok(())
    }

    fn content(&self) -> String {
        encode_content(&self.text, &self.stickers)
    }
}

/// Service for managing journal entries
#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn BookStore>,
}

impl JournalService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// All entries, newest first
    pub async fn list(&self, session: &Session) -> Result<Vec<JournalEntry>> {
        self.store.list_journal_entries(session).await
    }

    pub async fn count(&self, session: &Session) -> Result<i64> {
        self.store.count_journal_entries(session).await
    }

    pub async fn create(&self, session: &Session, draft: &JournalDraft) -> Result<JournalEntry> {
        draft.check()?;

        tracing::info!("Creating journal entry: {}", draft.title);
        let entry = NewJournalEntry {
            book_id: draft.book_id.clone(),
            title: draft.title.clone(),
            content: draft.content(),
        };

        self.store.insert_journal_entry(session, &entry).await
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        draft: &JournalDraft,
    ) -> Result<JournalEntry> {
        draft.check()?;

        tracing::debug!("Updating journal entry: {}", id);
        let update = JournalEntryUpdate {
            book_id: draft.book_id.clone(),
            title: draft.title.clone(),
            content: draft.content(),
        };

        self.store.update_journal_entry(session, id, &update).await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<()> {
        tracing::info!("Deleting journal entry: {}", id);
        self.store.delete_journal_entry(session, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, Repository};
    use crate::stickers::parse_content;
    use crate::store::{AuthProvider, LocalStore, SignUpOutcome};

    async fn create_test_service() -> (JournalService, Session) {
        let pool = create_memory_pool().await.unwrap();
        let store = Arc::new(LocalStore::new(Repository::new(pool)));
        let SignUpOutcome::SignedIn(session) = store
            .sign_up("diarist@example.com", "secret1", Some("Anne"))
            .await
            .unwrap()
        else {
            panic!("local sign-up should sign in");
        };
        (JournalService::new(store), session)
    }

    fn draft(title: &str, text: &str, stickers: &[&str]) -> JournalDraft {
        JournalDraft {
            title: title.to_string(),
            text: text.to_string(),
            book_id: None,
            stickers: stickers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_encodes_stickers() {
        let (service, session) = create_test_service().await;

        let entry = service
            .create(&session, &draft("Day one", "Loved chapter 3", &["heart1", "star2"]))
            .await
            .unwrap();

        assert!(entry.content.ends_with("<!--stickers:[\"heart1\",\"star2\"]-->"));
        let parsed = parse_content(&entry.content);
        assert_eq!(parsed.text, "Loved chapter 3");
        assert_eq!(parsed.stickers, vec!["heart1", "star2"]);
        assert_eq!(service.count(&session).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_rewrites_content() {
        let (service, session) = create_test_service().await;

        let entry = service
            .create(&session, &draft("Day one", "First", &["heart1"]))
            .await
            .unwrap();
        let updated = service
            .update(&session, &entry.id, &draft("Day one", "Second", &[]))
            .await
            .unwrap();

        assert_eq!(updated.content, "Second");
        assert_eq!(service.list(&session).await.unwrap()[0].content, "Second");
    }

    #[tokio::test]
    async fn test_blank_draft_rejected() {
        let (service, session) = create_test_service().await;

        let err = service
            .create(&session, &draft("Title", "   ", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.count(&session).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, session) = create_test_service().await;

        let entry = service
            .create(&session, &draft("T", "Body", &[]))
            .await
            .unwrap();
        service.delete(&session, &entry.id).await.unwrap();

        assert!(service.list(&session).await.unwrap().is_empty());
        assert!(matches!(
            service.delete(&session, &entry.id).await,
            Err(AppError::EntryNotFound(_))
        ));
    }
}
