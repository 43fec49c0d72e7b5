//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::DATABASE_FILE;
use crate::database::{create_pool, Repository};
use crate::error::{AppError, Result};
use crate::http::build_client;
use crate::metadata::{MetadataSource, OpenLibraryClient};
use crate::services::{
    AppSettings, AuthService, BackendKind, BooksService, DashboardService, JournalService,
    RecommenderService, SettingsService,
};
use crate::store::{
    AuthProvider, BookStore, HttpRecommendationFunction, LocalStore, RecommendationFunction,
    SupabaseClient,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Directory used when `BOOKNOOK_DATA_DIR` is not set
pub const DEFAULT_DATA_DIR: &str = ".booknook";

/// Resolve the data directory from the environment
pub fn data_dir_from_env() -> PathBuf {
    std::env::var_os("BOOKNOOK_DATA_DIR")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// The collaborators a backend provides
pub struct Backend {
    pub store: Arc<dyn BookStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub recommendations: Option<Arc<dyn RecommendationFunction>>,
}

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings: AppSettings,
    pub metadata: Arc<dyn MetadataSource>,
    pub auth: AuthService,
    pub books: BooksService,
    pub journal: JournalService,
    pub dashboard: DashboardService,
    pub recommender: RecommenderService,
}

impl AppState {
    /// Wire services around an already-built backend
    pub fn new(
        app_data_dir: PathBuf,
        settings: AppSettings,
        backend: Backend,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            auth: AuthService::new(backend.auth, app_data_dir.clone()),
            books: BooksService::new(backend.store.clone()),
            journal: JournalService::new(backend.store.clone()),
            dashboard: DashboardService::new(backend.store),
            recommender: RecommenderService::new(backend.recommendations, metadata.clone()),
            app_data_dir,
            settings,
            metadata,
        }
    }

    /// Load settings, build the configured backend and restore any session
    pub async fn initialize(app_data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;

        let settings = SettingsService::new(app_data_dir.clone())
            .load_effective()
            .await?;
        let http = build_client(settings.network.timeout_secs)?;

        let backend = match settings.backend.kind {
            BackendKind::Local => local_backend(&app_data_dir, &settings, &http).await?,
            BackendKind::Supabase => supabase_backend(&settings, &http)?,
        };

        let metadata = Arc::new(OpenLibraryClient::new(
            http,
            &settings.metadata.open_library_url,
            &settings.metadata.covers_url,
        ));

        let state = Self::new(app_data_dir, settings, backend, metadata);
        state.auth.restore().await?;

        tracing::info!("Application initialized successfully");
        Ok(state)
    }

    pub fn settings_service(&self) -> SettingsService {
        SettingsService::new(self.app_data_dir.clone())
    }
}

async fn local_backend(
    app_data_dir: &std::path::Path,
    settings: &AppSettings,
    http: &reqwest::Client,
) -> Result<Backend> {
    let pool = create_pool(&app_data_dir.join(DATABASE_FILE)).await?;
    let store = Arc::new(LocalStore::new(Repository::new(pool)));

    let recommendations = settings
        .backend
        .recommend_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| {
            tracing::info!("Using recommendation endpoint {}", url);
            Arc::new(HttpRecommendationFunction::new(
                http.clone(),
                url,
                settings.backend.supabase_anon_key.clone(),
            )) as Arc<dyn RecommendationFunction>
        });

    Ok(Backend {
        store: store.clone(),
        auth: store,
        recommendations,
    })
}

fn supabase_backend(settings: &AppSettings, http: &reqwest::Client) -> Result<Backend> {
    let (Some(url), Some(key)) = (
        settings.backend.supabase_url.as_deref(),
        settings.backend.supabase_anon_key.as_deref(),
    ) else {
        return Err(AppError::NotConfigured("Supabase URL and anon key".to_string()));
    };

    tracing::info!("Using hosted backend at {}", url);
    let client = Arc::new(SupabaseClient::new(http.clone(), url, key));

    Ok(Backend {
        store: client.clone(),
        auth: client.clone(),
        recommendations: Some(client),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_local() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");

        let state = AppState::initialize(dir.clone()).await.unwrap();

        assert!(dir.join(DATABASE_FILE).exists());
        assert!(dir.join(crate::config::SETTINGS_FILE).exists());
        assert_eq!(state.settings.backend.kind, BackendKind::Local);
        assert!(!state.auth.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_initialize_restores_session() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();

        let first = AppState::initialize(dir.clone()).await.unwrap();
        first
            .auth
            .sign_up("sophie@example.com", "calcifer", Some("Sophie"))
            .await
            .unwrap();
        drop(first);

        let second = AppState::initialize(dir).await.unwrap();
        let session = second.auth.require_session().await.unwrap();
        assert_eq!(session.greeting_name(), "Sophie");
    }
}
