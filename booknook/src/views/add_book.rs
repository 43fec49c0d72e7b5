//! Add-book form
//!
//! Fields are held as entered text and only turned into a [`NewBook`]
//! on submit. A metadata search result can pre-fill the form.

use crate::config::{GENRES, MAX_RATING};
use crate::database::{BookStatus, NewBook};
use crate::error::{AppError, Result};
use crate::metadata::{cover_url, CoverSize, SearchResult};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct AddBookForm {
    pub search_query: String,
    pub search_results: Vec<SearchResult>,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub isbn: String,
    pub genre: String,
    pub pages: String,
    /// 0 means unrated
    pub rating: i32,
    pub review: String,
    pub status: BookStatus,
    /// `YYYY-MM-DD`
    pub date_read: String,
}

impl Default for AddBookForm {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            search_results: Vec::new(),
            title: String::new(),
            author: String::new(),
            cover_url: String::new(),
            isbn: String::new(),
            genre: String::new(),
            pages: String::new(),
            rating: 0,
            review: String::new(),
            status: BookStatus::Read,
            date_read: String::new(),
        }
    }
}

impl AddBookForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form from a search result and close the result list
    pub fn apply_search_result(&mut self, result: &SearchResult, covers_base: &str) {
        self.title = result.title.clone();
        self.author = result.authors();
        self.cover_url = result
            .cover_i
            .map(|id| cover_url(covers_base, id, CoverSize::Large))
            .unwrap_or_default();
        self.isbn = result.isbn.first().cloned().unwrap_or_default();
        if let Some(genre) = match_genre(&result.subject) {
            self.genre = genre.to_string();
        }

        self.search_results.clear();
        self.search_query.clear();
    }

    /// Set the star rating; 0 clears it
    pub fn set_rating(&mut self, rating: i32) {
        self.rating = rating.clamp(0, MAX_RATING);
    }

    /// Title or author still blank
    pub fn missing_required(&self) -> bool {
        self.title.trim().is_empty() || self.author.trim().is_empty()
    }

    pub fn validate(&self) -> Result<NewBook> {
        if self.missing_required() {
            return Err(AppError::Validation(
                "Please enter title and author".to_string(),
            ));
        }

        let pages = match non_empty(&self.pages) {
            Some(text) => match text.parse::<i32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(AppError::Validation(format!(
                        "Pages must be a positive number, got {:?}",
                        text
                    )))
                }
            },
            None => None,
        };

        let date_read = non_empty(&self.date_read)
            .map(|text| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!("Date read must be YYYY-MM-DD, got {:?}", text))
                })
            })
            .transpose()?;

        Ok(NewBook {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            cover_url: non_empty(&self.cover_url).map(str::to_string),
            isbn: non_empty(&self.isbn).map(str::to_string),
            genre: non_empty(&self.genre).map(str::to_string),
            pages,
            date_read,
            rating: (self.rating > 0).then_some(self.rating),
            review: non_empty(&self.review).map(str::to_string),
            status: self.status,
        })
    }
}

/// First genre, in list order, that any subject mentions
pub fn match_genre(subjects: &[String]) -> Option<&'static str> {
    let subjects: Vec<String> = subjects.iter().map(|s| s.to_lowercase()).collect();
    GENRES
        .iter()
        .copied()
        .find(|genre| {
            let genre = genre.to_lowercase();
            subjects.iter().any(|s| s.contains(&genre))
        })
}

fn non_empty(text: &str) -> Option<&str> {
    Some(text.trim()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERS: &str = "https://covers.openlibrary.org";

    fn result() -> SearchResult {
        SearchResult {
            key: "/works/OL893415W".to_string(),
            title: "Dune".to_string(),
            author_name: vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()],
            cover_i: Some(11481354),
            first_publish_year: Some(1965),
            subject: vec![
                "Desert planets".to_string(),
                "Fantasy fiction".to_string(),
                "American Science fiction".to_string(),
            ],
            isbn: vec!["9780441172719".to_string(), "0441172717".to_string()],
        }
    }

    #[test]
    fn test_apply_search_result() {
        let mut form = AddBookForm::new();
        form.search_query = "dune".to_string();
        form.search_results = vec![result()];

        form.apply_search_result(&result(), COVERS);

        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "Frank Herbert, Brian Herbert");
        assert_eq!(form.cover_url, "https://covers.openlibrary.org/b/id/11481354-L.jpg");
        assert_eq!(form.isbn, "9780441172719");
        // "Fiction" comes before "Science Fiction" and "Fantasy" in the list
        assert_eq!(form.genre, "Fiction");
        assert!(form.search_query.is_empty());
        assert!(form.search_results.is_empty());
    }

    #[test]
    fn test_apply_sparse_result_keeps_genre() {
        let mut form = AddBookForm::new();
        form.genre = "History".to_string();
        form.cover_url = "old".to_string();

        let sparse = SearchResult {
            key: "/works/OL1W".to_string(),
            title: "Untitled".to_string(),
            author_name: vec![],
            cover_i: None,
            first_publish_year: None,
            subject: vec!["Cooking".to_string()],
            isbn: vec![],
        };
        form.apply_search_result(&sparse, COVERS);

        assert_eq!(form.author, "");
        assert_eq!(form.cover_url, "");
        assert_eq!(form.isbn, "");
        assert_eq!(form.genre, "History");
    }

    #[test]
    fn test_match_genre_order() {
        let subjects = vec!["Detective and mystery stories".to_string(), "Romance".to_string()];
        assert_eq!(match_genre(&subjects), Some("Mystery"));
        assert_eq!(match_genre(&["self-help techniques".to_string()]), Some("Self-Help"));
        assert_eq!(match_genre(&[]), None);
    }

    #[test]
    fn test_validate_requires_title_and_author() {
        let mut form = AddBookForm::new();
        form.title = "Dune".to_string();
        assert!(form.missing_required());
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        form.title.clear();
        form.author = "Frank Herbert".to_string();
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_builds_payload() {
        let mut form = AddBookForm::new();
        form.title = " Dune ".to_string();
        form.author = "Frank Herbert".to_string();
        form.pages = "412".to_string();
        form.date_read = "2024-05-01".to_string();
        form.set_rating(4);
        form.status = BookStatus::Reading;

        let book = form.validate().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.pages, Some(412));
        assert_eq!(book.date_read, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(book.rating, Some(4));
        assert_eq!(book.status, BookStatus::Reading);
        assert_eq!(book.cover_url, None);
        assert_eq!(book.review, None);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut form = AddBookForm::new();
        form.title = "T".to_string();
        form.author = "A".to_string();

        form.pages = "0".to_string();
        assert!(form.validate().is_err());

        form.pages = "12".to_string();
        form.date_read = "May 1st".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_rating_clears_and_clamps() {
        let mut form = AddBookForm::new();
        form.set_rating(9);
        assert_eq!(form.rating, 5);
        form.set_rating(0);
        assert_eq!(form.rating, 0);
        assert_eq!(form.status, BookStatus::Read);
    }
}
