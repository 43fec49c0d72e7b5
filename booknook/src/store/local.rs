//! Local backend
//!
//! Keeps accounts, books and journal entries in the SQLite database.
//! Passwords are stored as Argon2id PHC strings.

use super::{AuthProvider, BookStore, Session, SignUpOutcome};
use crate::config::MIN_PASSWORD_LENGTH;
use crate::database::{
    Book, BookStatus, JournalEntry, JournalEntryUpdate, NewBook, NewJournalEntry, Repository,
};
use crate::error::{AppError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

const SALT_SIZE: usize = 16;

/// SQLite-backed store and account provider
#[derive(Clone)]
pub struct LocalStore {
    repo: Repository,
}

impl LocalStore {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    fn open_session(user: &crate::database::UserAccount) -> Session {
        Session {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            expires_at: None,
        }
    }
}

/// Hash a password with a fresh random salt
fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let salt_string = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::Generic(format!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| AppError::Generic(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AppError::Generic(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::Auth("Unable to validate email address: invalid format".to_string()));
    }
    Ok(email)
}

#[async_trait]
impl AuthProvider for LocalStore {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email)?;
        let invalid = || AppError::Auth("Invalid login credentials".to_string());

        let user = self.repo.find_user_by_email(&email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        tracing::info!("Signed in local user: {}", user.id);
        Ok(Self::open_session(&user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome> {
        let email = normalize_email(email)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Auth("User already registered".to_string()));
        }

        let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());
        let hash = hash_password(password)?;
        let user = self.repo.create_user(&email, display_name, &hash).await?;

        tracing::info!("Registered local user: {}", user.id);
        Ok(SignUpOutcome::SignedIn(Self::open_session(&user)))
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        tracing::info!("Signed out local user: {}", session.user_id);
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let user = self
            .repo
            .find_user_by_email(&session.email)
            .await?
            .filter(|u| u.id == session.user_id)
            .ok_or_else(|| AppError::Auth("Session expired".to_string()))?;

        tracing::debug!("Reopened session for local user: {}", user.id);
        Ok(Self::open_session(&user))
    }
}

#[async_trait]
impl BookStore for LocalStore {
    async fn list_books(&self, session: &Session) -> Result<Vec<Book>> {
        self.repo.list_books(&session.user_id).await
    }

    async fn insert_book(&self, session: &Session, book: &NewBook) -> Result<Book> {
        self.repo.insert_book(&session.user_id, book).await
    }

    async fn delete_book(&self, session: &Session, id: &str) -> Result<()> {
        self.repo.delete_book(&session.user_id, id).await
    }

    async fn update_book_status(
        &self,
        session: &Session,
        id: &str,
        status: BookStatus,
    ) -> Result<Book> {
        self.repo.update_book_status(&session.user_id, id, status).await
    }

    async fn list_journal_entries(&self, session: &Session) -> Result<Vec<JournalEntry>> {
        self.repo.list_journal_entries(&session.user_id).await
    }

    async fn count_journal_entries(&self, session: &Session) -> Result<i64> {
        self.repo.count_journal_entries(&session.user_id).await
    }

    async fn insert_journal_entry(
        &self,
        session: &Session,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry> {
        self.repo.insert_journal_entry(&session.user_id, entry).await
    }

    async fn update_journal_entry(
        &self,
        session: &Session,
        id: &str,
        update: &JournalEntryUpdate,
    ) -> Result<JournalEntry> {
        self.repo
            .update_journal_entry(&session.user_id, id, update)
            .await
    }

    async fn delete_journal_entry(&self, session: &Session, id: &str) -> Result<()> {
        self.repo.delete_journal_entry(&session.user_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    async fn create_test_store() -> LocalStore {
        let pool = create_memory_pool().await.unwrap();
        LocalStore::new(Repository::new(pool))
    }

    fn signed_in(outcome: SignUpOutcome) -> Session {
        match outcome {
            SignUpOutcome::SignedIn(session) => session,
            other => panic!("expected a session, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("totoro42").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("totoro42", &hash).unwrap());
        assert!(!verify_password("catbus", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let store = create_test_store().await;

        let session = signed_in(
            store
                .sign_up(" Mei@Example.com ", "totoro42", Some("Mei"))
                .await
                .unwrap(),
        );
        assert_eq!(session.email, "mei@example.com");
        assert_eq!(session.display_name.as_deref(), Some("Mei"));

        let again = store.sign_in("mei@example.com", "totoro42").await.unwrap();
        assert_eq!(again.user_id, session.user_id);
        assert_ne!(again.access_token, session.access_token);
    }

    #[tokio::test]
    async fn test_refresh_reopens_known_user() {
        let store = create_test_store().await;
        let session = signed_in(
            store
                .sign_up("ursula@example.com", "kokiri1", None)
                .await
                .unwrap(),
        );

        let refreshed = store.refresh(&session).await.unwrap();
        assert_eq!(refreshed.user_id, session.user_id);
        assert_ne!(refreshed.access_token, session.access_token);

        let stranger = Session {
            user_id: "someone-else".to_string(),
            ..session
        };
        assert!(matches!(store.refresh(&stranger).await, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = create_test_store().await;
        store.sign_up("a@b.co", "secret1", None).await.unwrap();

        let err = store.sign_in("a@b.co", "secret2").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));

        let err = store.sign_in("nobody@b.co", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication failed: Invalid login credentials");
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let store = create_test_store().await;

        assert!(store.sign_up("not-an-email", "secret1", None).await.is_err());
        assert!(store.sign_up("a@b.co", "short", None).await.is_err());

        store.sign_up("a@b.co", "secret1", None).await.unwrap();
        let dup = store.sign_up("A@B.co", "secret1", None).await.unwrap_err();
        assert!(dup.to_string().contains("already registered"));
    }

    #[tokio::test]
    async fn test_books_scoped_to_session() {
        let store = create_test_store().await;
        let alice = signed_in(store.sign_up("alice@b.co", "secret1", None).await.unwrap());
        let bob = signed_in(store.sign_up("bob@b.co", "secret1", None).await.unwrap());

        store
            .insert_book(&alice, &NewBook::new("Spirited", "A", BookStatus::Read))
            .await
            .unwrap();

        assert_eq!(store.list_books(&alice).await.unwrap().len(), 1);
        assert!(store.list_books(&bob).await.unwrap().is_empty());
    }
}
