//! Recommender page state

use crate::error::AppError;
use crate::services::{Recommendation, RecommendationRequest};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecommendMode {
    #[default]
    Bookshelf,
    Genre,
    Custom,
}

impl fmt::Display for RecommendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bookshelf => "bookshelf",
            Self::Genre => "genre",
            Self::Custom => "custom",
        })
    }
}

impl FromStr for RecommendMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bookshelf" => Ok(Self::Bookshelf),
            "genre" => Ok(Self::Genre),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::Validation(format!(
                "Unknown mode: {} (expected bookshelf, genre or custom)",
                other
            ))),
        }
    }
}

/// One recommendation session as shown on the page
#[derive(Debug, Clone, Default)]
pub struct RecommenderView {
    pub mode: RecommendMode,
    pub genre: String,
    pub custom_prompt: String,
    pub loading: bool,
    pub results: Vec<Recommendation>,
}

impl RecommenderView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the selected mode has the input it needs
    pub fn can_submit(&self, book_count: usize) -> bool {
        match self.mode {
            RecommendMode::Bookshelf => book_count > 0,
            RecommendMode::Genre => !self.genre.trim().is_empty(),
            RecommendMode::Custom => !self.custom_prompt.trim().is_empty(),
        }
    }

    pub fn request(&self) -> RecommendationRequest {
        match self.mode {
            RecommendMode::Bookshelf => RecommendationRequest::Bookshelf,
            RecommendMode::Genre => RecommendationRequest::Genre(self.genre.clone()),
            RecommendMode::Custom => RecommendationRequest::Custom(self.custom_prompt.clone()),
        }
    }

    /// A new request clears the previous results
    pub fn start(&mut self) {
        self.loading = true;
        self.results.clear();
    }

    pub fn finish(&mut self, results: Vec<Recommendation>) {
        self.loading = false;
        self.results = results;
    }

    pub fn fail(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit() {
        let mut view = RecommenderView::new();
        assert!(!view.can_submit(0));
        assert!(view.can_submit(3));

        view.mode = RecommendMode::Genre;
        assert!(!view.can_submit(3));
        view.genre = "Mystery".to_string();
        assert!(view.can_submit(0));

        view.mode = RecommendMode::Custom;
        view.custom_prompt = "  ".to_string();
        assert!(!view.can_submit(10));
    }

    #[test]
    fn test_request() {
        let mut view = RecommenderView::new();
        view.mode = RecommendMode::Genre;
        view.genre = "Fantasy".to_string();
        assert_eq!(
            view.request(),
            RecommendationRequest::Genre("Fantasy".to_string())
        );
    }

    #[test]
    fn test_session_lifecycle() {
        let mut view = RecommenderView::new();
        view.finish(vec![Recommendation {
            title: "Momo".to_string(),
            author: "Michael Ende".to_string(),
            reason: "Whimsical".to_string(),
            cover_url: None,
        }]);

        view.start();
        assert!(view.loading);
        assert!(view.results.is_empty());

        view.fail();
        assert!(!view.loading);
        assert!(view.results.is_empty());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("custom".parse::<RecommendMode>().unwrap(), RecommendMode::Custom);
        assert!("random".parse::<RecommendMode>().is_err());
    }
}
