//! Recommender service
//!
//! One recommendation session: build a prompt from the shelf, a genre or
//! free text, send it to the remote function, then look up a cover for
//! each suggestion. Cover lookups run concurrently and a miss simply
//! leaves the cover empty.

use crate::config::{COVER_LOOKUP_LIMIT, PROMPT_BOOK_LIMIT};
use crate::database::Book;
use crate::error::{AppError, Result};
use crate::metadata::{cover_url, CoverSize, MetadataSource};
use crate::store::{RawRecommendation, RecommendationFunction, Session};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// A suggested book, held only for the duration of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub reason: String,
    pub cover_url: Option<String>,
}

impl From<RawRecommendation> for Recommendation {
    fn from(raw: RawRecommendation) -> Self {
        Self {
            title: raw.title,
            author: raw.author,
            reason: raw.reason,
            cover_url: None,
        }
    }
}

/// What the recommendations should be based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationRequest {
    /// The user's own shelf
    Bookshelf,
    Genre(String),
    Custom(String),
}

const MISSING_INPUT: &str = "Please select a mode and provide the required input";

/// Build the prompt sent to the recommendation function
pub fn build_prompt(request: &RecommendationRequest, books: &[Book]) -> Result<String> {
    match request {
        RecommendationRequest::Bookshelf if !books.is_empty() => {
            let list = books
                .iter()
                .take(PROMPT_BOOK_LIMIT)
                .map(describe_for_prompt)
                .collect::<Vec<_>>()
                .join("; ");
            Ok(format!(
                "Based on these books I've read: {}. Recommend 5 books I might enjoy. \
                 For each, give the title, author, and a brief reason why I'd like it \
                 based on my reading history.",
                list
            ))
        }
        RecommendationRequest::Genre(genre) if !genre.trim().is_empty() => Ok(format!(
            "Recommend 5 highly-rated {} books. For each, give the title, author, \
             and a brief description of why it's great.",
            genre.trim()
        )),
        RecommendationRequest::Custom(text) if !text.trim().is_empty() => Ok(format!(
            "{}. Recommend 5 books that match this request. For each, give the title, \
             author, and a brief reason.",
            text.trim()
        )),
        _ => Err(AppError::Validation(MISSING_INPUT.to_string())),
    }
}

fn describe_for_prompt(book: &Book) -> String {
    let genre = book.genre.as_deref().unwrap_or("unknown genre");
    let rating = book
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unrated".to_string());
    format!("\"{}\" by {} ({}, rated {}/5)", book.title, book.author, genre, rating)
}

/// Service for recommendation sessions
#[derive(Clone)]
pub struct RecommenderService {
    function: Option<Arc<dyn RecommendationFunction>>,
    metadata: Arc<dyn MetadataSource>,
}

impl RecommenderService {
    pub fn new(
        function: Option<Arc<dyn RecommendationFunction>>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self { function, metadata }
    }

    pub fn is_available(&self) -> bool {
        self.function.is_some()
    }

    /// Run one recommendation session
    pub async fn recommend(
        &self,
        session: Option<&Session>,
        request: &RecommendationRequest,
        books: &[Book],
    ) -> Result<Vec<Recommendation>> {
        let prompt = build_prompt(request, books)?;

        let function = self.function.as_ref().ok_or_else(|| {
            AppError::NotConfigured(
                "no recommendation function (set BOOKNOOK_RECOMMEND_URL or use the supabase backend)"
                    .to_string(),
            )
        })?;

        tracing::info!("Requesting recommendations ({:?})", request);
        let raw = function.invoke(session, &prompt).await?;

        Ok(self
            .enrich(raw.into_iter().map(Recommendation::from).collect())
            .await)
    }

    /// Attach a cover to each recommendation, keeping order
    pub async fn enrich(&self, recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        join_all(recommendations.into_iter().map(|rec| self.with_cover(rec))).await
    }

    async fn with_cover(&self, mut rec: Recommendation) -> Recommendation {
        let query = format!("{} {}", rec.title, rec.author);
        match self.metadata.search(&query, COVER_LOOKUP_LIMIT).await {
            Ok(results) => {
                rec.cover_url = results
                    .first()
                    .and_then(|r| r.cover_i)
                    .map(|id| cover_url(self.metadata.covers_base(), id, CoverSize::Medium));
            }
            Err(e) => tracing::warn!("Cover lookup failed for {:?}: {}", rec.title, e),
        }
        rec
    }
}
