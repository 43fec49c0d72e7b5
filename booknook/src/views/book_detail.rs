//! Book detail with its fetched description

use crate::database::Book;
use crate::error::Result;

/// Shown when the description lookup itself fails
pub const DESCRIPTION_FAILED: &str = "Failed to fetch book description.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DescriptionState {
    #[default]
    Idle,
    Loading,
    Loaded(String),
    Failed(String),
}

/// The open detail view of one book
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub description: DescriptionState,
}

impl BookDetail {
    /// Opening the view starts a description lookup
    pub fn open(book: Book) -> Self {
        Self {
            book,
            description: DescriptionState::Loading,
        }
    }

    /// Record the lookup outcome
    pub fn finish(&mut self, result: Result<String>) {
        self.description = match result {
            Ok(text) => DescriptionState::Loaded(text),
            Err(e) => {
                tracing::warn!("Description lookup for {} failed: {}", self.book.id, e);
                DescriptionState::Failed(DESCRIPTION_FAILED.to_string())
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        self.description == DescriptionState::Loading
    }
}
