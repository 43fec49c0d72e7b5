//! Services module
//!
//! Business logic services that coordinate between commands and the
//! backend stores.

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod journal;
pub mod recommender;
pub mod settings;

pub use auth::AuthService;
pub use books::BooksService;
pub use dashboard::DashboardService;
pub use journal::{JournalDraft, JournalService};
pub use recommender::{Recommendation, RecommendationRequest, RecommenderService};
pub use settings::{AppSettings, BackendKind, SettingsService};
