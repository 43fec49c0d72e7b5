//! One-shot notifications
//!
//! Every user action reports its outcome with a toast. The constructors
//! below are the complete set of messages the application shows.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A short title with an optional description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: ToastVariant::Destructive,
        }
    }

    /// Generic failure toast for a failed remote call
    pub fn error(description: impl Into<String>) -> Self {
        Self::destructive("Error", description)
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }

    // ===== Auth =====

    pub fn welcome_back() -> Self {
        Self::info("Welcome back!", Some("So happy to see you again!".to_string()))
    }

    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::destructive("Login failed", message)
    }

    pub fn account_created() -> Self {
        Self::info(
            "Account created!",
            Some("Welcome to your cozy book nook!".to_string()),
        )
    }

    pub fn confirm_email(email: &str) -> Self {
        Self::info(
            "Account created!",
            Some(format!("Check {} to confirm your account", email)),
        )
    }

    pub fn signup_failed(message: impl Into<String>) -> Self {
        Self::destructive("Signup failed", message)
    }

    pub fn sign_in_required() -> Self {
        Self::destructive(
            "Not signed in",
            "Sign in first with `booknook auth sign-in`",
        )
    }

    pub fn logout_failed() -> Self {
        Self::error("Failed to log out")
    }

    // ===== Books =====

    pub fn missing_book_fields() -> Self {
        Self::destructive("Missing fields", "Please enter title and author")
    }

    pub fn search_failed() -> Self {
        Self::destructive("Search failed", "Could not search OpenLibrary")
    }

    pub fn book_added(title: &str) -> Self {
        Self::info(
            "Book added!",
            Some(format!("{} is now in your bookshelf", title)),
        )
    }

    pub fn book_add_failed() -> Self {
        Self::error("Failed to add book")
    }

    pub fn book_deleted() -> Self {
        Self::info("Book deleted", None)
    }

    pub fn book_delete_failed() -> Self {
        Self::error("Failed to delete book")
    }

    pub fn status_updated(title: &str, label: &str) -> Self {
        Self::info("Status updated", Some(format!("{} moved to {}", title, label)))
    }

    // ===== Journal =====

    pub fn journal_incomplete() -> Self {
        Self::destructive("Oops!", "Please fill in the title and your thoughts!")
    }

    pub fn entry_created() -> Self {
        Self::info("Entry created!", Some("Your thoughts have been saved!".to_string()))
    }

    pub fn entry_create_failed() -> Self {
        Self::error("Failed to create entry")
    }

    pub fn entry_updated() -> Self {
        Self::info(
            "Entry updated!",
            Some("Your journal entry has been saved!".to_string()),
        )
    }

    pub fn entry_update_failed() -> Self {
        Self::error("Failed to update entry")
    }

    pub fn entry_deleted() -> Self {
        Self::info("Entry deleted", None)
    }

    pub fn entry_delete_failed() -> Self {
        Self::error("Failed to delete entry")
    }

    // ===== Recommender =====

    pub fn missing_input() -> Self {
        Self::destructive(
            "Missing input",
            "Please select a mode and provide the required input",
        )
    }

    pub fn recommendations_failed() -> Self {
        Self::error("Failed to get recommendations. Please try again.")
    }

    pub fn recommendation_added(title: &str) -> Self {
        Self::info(
            "Added!",
            Some(format!("{} added to your want-to-read list", title)),
        )
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.variant {
            ToastVariant::Default => "✓",
            ToastVariant::Destructive => "✗",
        };
        match &self.description {
            Some(description) => write!(f, "{} {}: {}", marker, self.title, description),
            None => write!(f, "{} {}", marker, self.title),
        }
    }
}
