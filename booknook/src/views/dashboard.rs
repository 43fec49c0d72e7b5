//! Dashboard summary

use crate::config::RECENT_BOOKS;
use crate::database::{Book, BookStatus};
use serde::Serialize;

/// Shown in place of the average when nothing is rated
pub const NO_AVERAGE: &str = "N/A";

/// Everything the dashboard displays, computed from one load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_books: usize,
    pub currently_reading: usize,
    /// One decimal place, or [`NO_AVERAGE`]
    pub average_rating: String,
    pub journal_count: i64,
    pub recent: Vec<Book>,
    pub goal: u32,
    /// Every tracked book counts toward the goal
    pub goal_progress_percent: u32,
}

impl DashboardSnapshot {
    /// Summarise `books` (newest first) and the journal count
    pub fn new(books: &[Book], journal_count: i64, goal: u32) -> Self {
        Self {
            total_books: books.len(),
            currently_reading: count_status(books, BookStatus::Reading),
            average_rating: average_rating(books),
            journal_count,
            recent: books.iter().take(RECENT_BOOKS).cloned().collect(),
            goal,
            goal_progress_percent: progress_percent(books.len(), goal),
        }
    }

    pub fn greeting(name: &str) -> String {
        format!("Welcome back, {}!", name)
    }

    pub fn encouragement(&self) -> &'static str {
        if self.total_books > 0 {
            "You're off to a great start! Keep reading! 📚"
        } else {
            "Start your reading journey today! 🌟"
        }
    }
}

fn count_status(books: &[Book], status: BookStatus) -> usize {
    books.iter().filter(|b| b.status == Some(status)).count()
}

/// Mean of the rated books to one decimal
pub fn average_rating(books: &[Book]) -> String {
    let ratings: Vec<i32> = books.iter().filter_map(|b| b.rating).collect();
    if ratings.is_empty() {
        return NO_AVERAGE.to_string();
    }

    let sum: i32 = ratings.iter().sum();
    format!("{:.1}", f64::from(sum) / ratings.len() as f64)
}

/// Share of the goal reached, capped at 100
pub fn progress_percent(books: usize, goal: u32) -> u32 {
    if goal == 0 {
        return 100;
    }
    let percent = books as f64 / f64::from(goal) * 100.0;
    percent.min(100.0).round() as u32
}
