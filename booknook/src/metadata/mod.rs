//! Public book metadata
//!
//! Search results, cover images and work descriptions come from Open
//! Library. Lookups are best effort: a miss degrades to a placeholder
//! instead of failing the surrounding action.

pub mod openlibrary;

pub use openlibrary::OpenLibraryClient;

use crate::config::DESCRIPTION_LOOKUP_LIMIT;
use crate::database::Book;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Shown when the matching work has no description
pub const NO_DESCRIPTION: &str = "No description available for this book.";

/// Shown when no work matches the book at all
pub const NOT_FOUND_DESCRIPTION: &str = "No description found in OpenLibrary.";

/// One candidate work from a keyword search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Work path, e.g. `/works/OL27448W`
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
}

impl SearchResult {
    /// Authors joined for display, empty when unknown
    pub fn authors(&self) -> String {
        self.author_name.join(", ")
    }
}

/// The parts of a work record the application reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkDetails {
    pub description: Option<String>,
}

/// Cover image sizes served by the covers endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
        }
    }
}

/// URL of a cover image by cover id
pub fn cover_url(covers_base: &str, cover_id: i64, size: CoverSize) -> String {
    format!(
        "{}/b/id/{}-{}.jpg",
        covers_base.trim_end_matches('/'),
        cover_id,
        size.suffix()
    )
}

/// Keyword search and work lookup
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>>;

    /// Work record for a key from [`SearchResult::key`]
    async fn work(&self, key: &str) -> Result<Option<WorkDetails>>;

    /// Base URL of the covers endpoint
    fn covers_base(&self) -> &str;
}

/// Query used to find the work behind a tracked book
pub fn description_query(book: &Book) -> String {
    match book.isbn.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        Some(isbn) => format!("isbn:{}", isbn),
        None => format!("{} {}", book.title, book.author),
    }
}

/// Fetch a descriptive summary for a book.
///
/// Misses yield one of the placeholder texts; transport failures are
/// returned to the caller.
pub async fn describe(source: &dyn MetadataSource, book: &Book) -> Result<String> {
    let query = description_query(book);
    let results = source.search(&query, DESCRIPTION_LOOKUP_LIMIT).await?;

    let Some(first) = results.first() else {
        tracing::debug!("No work found for {:?}", query);
        return Ok(NOT_FOUND_DESCRIPTION.to_string());
    };

    let details = source.work(&first.key).await?;
    Ok(details
        .and_then(|d| d.description)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::BookStatus;
    use chrono::Utc;
    use std::sync::Mutex;

    struct FakeSource {
        results: Vec<SearchResult>,
        description: Option<String>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn search(&self, query: &str, _limit: u32) -> Result<Vec<SearchResult>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.results.clone())
        }

        async fn work(&self, _key: &str) -> Result<Option<WorkDetails>> {
            Ok(Some(WorkDetails {
                description: self.description.clone(),
            }))
        }

        fn covers_base(&self) -> &str {
            "https://covers.example"
        }
    }

    fn book(isbn: Option<&str>) -> Book {
        Book {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            title: "Earthsea".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            cover_url: None,
            isbn: isbn.map(str::to_string),
            genre: None,
            pages: None,
            date_read: None,
            rating: None,
            review: None,
            status: Some(BookStatus::Read),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn result(key: &str) -> SearchResult {
        SearchResult {
            key: key.to_string(),
            title: "A Wizard of Earthsea".to_string(),
            author_name: vec!["Ursula K. Le Guin".to_string()],
            cover_i: Some(42),
            first_publish_year: Some(1968),
            subject: vec![],
            isbn: vec![],
        }
    }

    #[test]
    fn test_cover_url_sizes() {
        assert_eq!(
            cover_url("https://covers.openlibrary.org/", 8231856, CoverSize::Large),
            "https://covers.openlibrary.org/b/id/8231856-L.jpg"
        );
        assert_eq!(
            cover_url("https://covers.openlibrary.org", 1, CoverSize::Small),
            "https://covers.openlibrary.org/b/id/1-S.jpg"
        );
    }

    #[test]
    fn test_description_query_prefers_isbn() {
        assert_eq!(description_query(&book(Some("9780547773742"))), "isbn:9780547773742");
        assert_eq!(description_query(&book(Some("  "))), "Earthsea Ursula K. Le Guin");
        assert_eq!(description_query(&book(None)), "Earthsea Ursula K. Le Guin");
    }

    #[tokio::test]
    async fn test_describe_found() {
        let source = FakeSource {
            results: vec![result("/works/OL1W")],
            description: Some("A young wizard...".to_string()),
            queries: Mutex::new(vec![]),
        };

        let text = describe(&source, &book(None)).await.unwrap();
        assert_eq!(text, "A young wizard...");
    }

    #[tokio::test]
    async fn test_describe_placeholders() {
        let empty = FakeSource {
            results: vec![],
            description: None,
            queries: Mutex::new(vec![]),
        };
        assert_eq!(describe(&empty, &book(None)).await.unwrap(), NOT_FOUND_DESCRIPTION);

        let bare = FakeSource {
            results: vec![result("/works/OL1W")],
            description: None,
            queries: Mutex::new(vec![]),
        };
        assert_eq!(describe(&bare, &book(None)).await.unwrap(), NO_DESCRIPTION);
    }

    #[test]
    fn test_search_result_defaults() {
        let parsed: SearchResult =
            serde_json::from_str(r#"{"key":"/works/OL2W","title":"Untitled"}"#).unwrap();
        assert!(parsed.author_name.is_empty());
        assert_eq!(parsed.authors(), "");
        assert!(parsed.cover_i.is_none());
    }
}
