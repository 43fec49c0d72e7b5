//! Auth service
//!
//! The shared session accessor. Holds the signed-in user's session,
//! persists it to the data directory so it survives restarts, and
//! forwards account operations to the backend's [`AuthProvider`].

use crate::config::SESSION_FILE;
use crate::error::{AppError, Result};
use crate::store::{AuthProvider, Session, SignUpOutcome};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Service for the current user's session
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    session_path: PathBuf,
    current: Arc<RwLock<Option<Session>>>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>, app_data_dir: PathBuf) -> Self {
        Self {
            provider,
            session_path: app_data_dir.join(SESSION_FILE),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Load a previously persisted session. Expired sessions are refreshed
    /// through the provider when possible and discarded otherwise.
    pub async fn restore(&self) -> Result<Option<Session>> {
        if !self.session_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.session_path).await?;
        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                fs::remove_file(&self.session_path).await?;
                return Ok(None);
            }
        };

        if session.is_expired(Utc::now()) {
            tracing::info!("Stored session has expired");
            if session.refresh_token.is_some() {
                match self.provider.refresh(&session).await {
                    Ok(refreshed) => {
                        self.store(refreshed.clone()).await?;
                        return Ok(Some(refreshed));
                    }
                    Err(e) => tracing::warn!("Could not refresh session: {}", e),
                }
            }
            fs::remove_file(&self.session_path).await?;
            return Ok(None);
        }

        tracing::debug!("Restored session for {}", session.user_id);
        *self.current.write().await = Some(session.clone());
        Ok(Some(session))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter your email and password".to_string(),
            ));
        }

        let session = self.provider.sign_in(email.trim(), password).await?;
        self.store(session.clone()).await?;
        Ok(session)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter your email and password".to_string(),
            ));
        }

        let outcome = self
            .provider
            .sign_up(email.trim(), password, display_name)
            .await?;

        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.store(session.clone()).await?;
        }
        Ok(outcome)
    }

    /// End the session. A failed remote sign-out keeps the session.
    pub async fn sign_out(&self) -> Result<()> {
        let session = self.require_session().await?;
        self.provider.sign_out(&session).await?;

        *self.current.write().await = None;
        if self.session_path.exists() {
            fs::remove_file(&self.session_path).await?;
        }

        Ok(())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or [`AppError::NotSignedIn`]
    pub async fn require_session(&self) -> Result<Session> {
        self.current_session().await.ok_or(AppError::NotSignedIn)
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn store(&self, session: Session) -> Result<()> {
        let content = serde_json::to_string_pretty(&session)?;
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.session_path, content).await?;

        tracing::info!("Session stored for {}", session.user_id);
        *self.current.write().await = Some(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, Repository};
    use crate::store::LocalStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Provider that only knows how to refresh one token
    struct RefreshingProvider;

    #[async_trait]
    impl AuthProvider for RefreshingProvider {
        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session> {
            Err(AppError::Auth("unused".to_string()))
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &str,
            _display_name: Option<&str>,
        ) -> Result<SignUpOutcome> {
            Err(AppError::Auth("unused".to_string()))
        }

        async fn sign_out(&self, _session: &Session) -> Result<()> {
            Ok(())
        }

        async fn refresh(&self, session: &Session) -> Result<Session> {
            if session.refresh_token.as_deref() != Some("good-refresh") {
                return Err(AppError::Auth("Invalid Refresh Token".to_string()));
            }
            Ok(Session {
                access_token: "fresh".to_string(),
                refresh_token: Some("next-refresh".to_string()),
                expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
                ..session.clone()
            })
        }
    }

    fn expired_session(refresh_token: Option<&str>) -> Session {
        Session {
            user_id: "u1".to_string(),
            email: "kiki@example.com".to_string(),
            display_name: Some("Kiki".to_string()),
            access_token: "stale".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: Some(Utc::now() - chrono::Duration::minutes(5)),
        }
    }

    async fn create_test_service(dir: &TempDir) -> AuthService {
        let pool = create_memory_pool().await.unwrap();
        let store = LocalStore::new(Repository::new(pool));
        AuthService::new(Arc::new(store), dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn test_sign_up_persists_session() {
        let temp = TempDir::new().unwrap();
        let service = create_test_service(&temp).await;

        let outcome = service.sign_up("mei@example.com", "totoro42", Some("Mei")).await.unwrap();
        assert!(matches!(outcome, SignUpOutcome::SignedIn(_)));
        assert!(service.is_signed_in().await);
        assert!(temp.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_restore_and_sign_out() {
        let temp = TempDir::new().unwrap();
        let pool = create_memory_pool().await.unwrap();
        let store: Arc<dyn AuthProvider> = Arc::new(LocalStore::new(Repository::new(pool)));

        let first = AuthService::new(store.clone(), temp.path().to_path_buf());
        first.sign_up("mei@example.com", "totoro42", None).await.unwrap();
        let original = first.current_session().await.unwrap();

        let second = AuthService::new(store, temp.path().to_path_buf());
        let restored = second.restore().await.unwrap().unwrap();
        assert_eq!(restored, original);

        second.sign_out().await.unwrap();
        assert!(!second.is_signed_in().await);
        assert!(!temp.path().join("session.json").exists());
        assert!(matches!(second.require_session().await, Err(AppError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_expired_session_discarded() {
        let temp = TempDir::new().unwrap();
        let service = create_test_service(&temp).await;

        let expired = Session {
            user_id: "u1".to_string(),
            email: "a@b.co".to_string(),
            display_name: None,
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() - chrono::Duration::minutes(5)),
        };
        std::fs::write(
            temp.path().join("session.json"),
            serde_json::to_string(&expired).unwrap(),
        )
        .unwrap();

        assert!(service.restore().await.unwrap().is_none());
        assert!(!service.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_before_backend() {
        let temp = TempDir::new().unwrap();
        let service = create_test_service(&temp).await;

        let err = service.sign_in("", "x").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_expired_session_refreshed() {
        let temp = TempDir::new().unwrap();
        let service = AuthService::new(Arc::new(RefreshingProvider), temp.path().to_path_buf());
        std::fs::write(
            temp.path().join("session.json"),
            serde_json::to_string(&expired_session(Some("good-refresh"))).unwrap(),
        )
        .unwrap();

        let restored = service.restore().await.unwrap().unwrap();
        assert_eq!(restored.access_token, "fresh");
        assert!(!restored.is_expired(Utc::now()));

        // The refreshed pair replaces the stored one
        let stored: Session = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("session.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("next-refresh"));
    }

    #[tokio::test]
    async fn test_rejected_refresh_discards_session() {
        let temp = TempDir::new().unwrap();
        let service = AuthService::new(Arc::new(RefreshingProvider), temp.path().to_path_buf());
        std::fs::write(
            temp.path().join("session.json"),
            serde_json::to_string(&expired_session(Some("revoked"))).unwrap(),
        )
        .unwrap();

        assert!(service.restore().await.unwrap().is_none());
        assert!(!service.is_signed_in().await);
        assert!(!temp.path().join("session.json").exists());
    }
}
