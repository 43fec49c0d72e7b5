//! Settings service
//!
//! Manages application settings persistence using JSON file storage,
//! with environment variable overrides applied on top.

use crate::config::{
    DEFAULT_COVERS_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OPEN_LIBRARY_URL,
    DEFAULT_READING_GOAL, SETTINGS_FILE,
};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Which store holds books, journal entries and accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite database in the data directory
    #[default]
    Local,
    /// Hosted backend-as-a-service (REST tables, auth and functions)
    Supabase,
}

impl std::str::FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "supabase" => Ok(Self::Supabase),
            other => Err(AppError::Validation(format!("Unknown backend: {}", other))),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendSettings {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    /// Recommendation endpoint used with the local backend
    #[serde(default)]
    pub recommend_url: Option<String>,
}

/// Public metadata API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataSettings {
    #[serde(default = "default_open_library_url")]
    pub open_library_url: String,
    #[serde(default = "default_covers_url")]
    pub covers_url: String,
}

fn default_open_library_url() -> String {
    DEFAULT_OPEN_LIBRARY_URL.to_string()
}

fn default_covers_url() -> String {
    DEFAULT_COVERS_URL.to_string()
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            open_library_url: default_open_library_url(),
            covers_url: default_covers_url(),
        }
    }
}

/// Reading goal shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingSettings {
    #[serde(default = "default_yearly_goal")]
    pub yearly_goal: u32,
}

fn default_yearly_goal() -> u32 {
    DEFAULT_READING_GOAL
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            yearly_goal: default_yearly_goal(),
        }
    }
}

/// Outbound HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub metadata: MetadataSettings,
    #[serde(default)]
    pub reading: ReadingSettings,
    #[serde(default)]
    pub network: NetworkSettings,
}

impl AppSettings {
    /// Apply `BOOKNOOK_*` overrides from the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("BOOKNOOK_BACKEND") {
            self.backend.kind = kind.parse()?;
        }
        if let Some(url) = lookup("BOOKNOOK_SUPABASE_URL") {
            self.backend.supabase_url = Some(url);
        }
        if let Some(key) = lookup("BOOKNOOK_SUPABASE_ANON_KEY") {
            self.backend.supabase_anon_key = Some(key);
        }
        if let Some(url) = lookup("BOOKNOOK_RECOMMEND_URL") {
            self.backend.recommend_url = Some(url);
        }
        if let Some(url) = lookup("BOOKNOOK_OPEN_LIBRARY_URL") {
            self.metadata.open_library_url = url;
        }
        Ok(())
    }

    /// Check that the settings describe a usable configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.kind == BackendKind::Supabase {
            let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
            if !has(&self.backend.supabase_url) {
                return Err(AppError::Validation(
                    "Supabase backend selected but no project URL is set".to_string(),
                ));
            }
            if !has(&self.backend.supabase_anon_key) {
                return Err(AppError::Validation(
                    "Supabase backend selected but no anon key is set".to_string(),
                ));
            }
        }

        if self.metadata.open_library_url.trim().is_empty()
            || self.metadata.covers_url.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Open Library endpoints must not be empty".to_string(),
            ));
        }

        if self.reading.yearly_goal == 0 {
            return Err(AppError::Validation(
                "Yearly reading goal must be at least 1".to_string(),
            ));
        }

        if self.network.timeout_secs == 0 {
            return Err(AppError::Validation(
                "HTTP timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILE),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Load settings, apply process environment overrides and validate
    pub async fn load_effective(&self) -> Result<AppSettings> {
        let mut settings = self.load().await?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update the yearly reading goal
    pub async fn update_reading_goal(&self, yearly_goal: u32) -> Result<()> {
        let mut settings = self.load().await?;
        settings.reading.yearly_goal = yearly_goal;
        settings.validate()?;
        self.save(&settings).await?;
        Ok(())
    }
}
