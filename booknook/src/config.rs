//! Application configuration constants
//!
//! Central location for catalog lists, request limits and validation
//! boundaries used throughout the application. Runtime values that a
//! user may change live in [`crate::services::settings`].

// ===== Genres =====

/// Genres offered by the add-book form, in matching priority order.
/// Search-result subjects are matched against these front to back.
pub const GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Romance",
    "Science Fiction",
    "Fantasy",
    "Thriller",
    "Biography",
    "Self-Help",
    "History",
    "Other",
];

/// Genres offered by the recommender (the catch-all is not a useful prompt)
pub fn recommendable_genres() -> impl Iterator<Item = &'static str> {
    GENRES.iter().copied().filter(|g| *g != "Other")
}

// ===== Metadata Search Limits =====

/// Results requested when searching from the add-book form
pub const ADD_BOOK_SEARCH_LIMIT: u32 = 8;

/// Results requested when looking up a cover for a recommendation
pub const COVER_LOOKUP_LIMIT: u32 = 5;

/// Results requested when resolving a book's work for its description
pub const DESCRIPTION_LOOKUP_LIMIT: u32 = 1;

// ===== Journal =====

/// Maximum stickers attached to one journal entry
pub const MAX_STICKERS: usize = 5;

/// Sentinel the journal form uses for "no associated book"
pub const NO_BOOK_SENTINEL: &str = "none";

// ===== Dashboard =====

/// Number of most recently added books shown on the dashboard
pub const RECENT_BOOKS: usize = 5;

/// Default yearly reading goal (books)
pub const DEFAULT_READING_GOAL: u32 = 24;

// ===== Recommendations =====

/// Name of the remote function that produces recommendations
pub const RECOMMEND_FUNCTION: &str = "recommend-books";

/// Books from the shelf included in a bookshelf-based prompt
pub const PROMPT_BOOK_LIMIT: usize = 10;

// ===== Books =====

/// Lowest star rating
pub const MIN_RATING: i32 = 1;

/// Highest star rating
pub const MAX_RATING: i32 = 5;

// ===== Accounts =====

/// Shortest password accepted for local accounts (matches the hosted default)
pub const MIN_PASSWORD_LENGTH: usize = 6;

// ===== Endpoints =====

/// Open Library API base
pub const DEFAULT_OPEN_LIBRARY_URL: &str = "https://openlibrary.org";

/// Open Library cover image base
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Default request timeout for outbound HTTP calls, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// User agent sent with every outbound request
pub const HTTP_USER_AGENT: &str = concat!("BookNook/", env!("CARGO_PKG_VERSION"));

// ===== Files =====

/// SQLite database file name inside the data directory
pub const DATABASE_FILE: &str = "booknook.db";

/// Persisted settings file name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Persisted session file name inside the data directory
pub const SESSION_FILE: &str = "session.json";
