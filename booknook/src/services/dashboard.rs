//! Dashboard service
//!
//! Loads the shelf and the journal count in parallel and folds them into
//! a [`DashboardSnapshot`].

use crate::error::Result;
use crate::store::{BookStore, Session};
use crate::views::dashboard::DashboardSnapshot;
use std::sync::Arc;

/// Service for the dashboard summary
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn BookStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, session: &Session, goal: u32) -> Result<DashboardSnapshot> {
        let (books, journal_count) = tokio::try_join!(
            self.store.list_books(session),
            self.store.count_journal_entries(session),
        )?;

        tracing::debug!(
            "Dashboard loaded: {} books, {} journal entries",
            books.len(),
            journal_count
        );

        Ok(DashboardSnapshot::new(&books, journal_count, goal))
    }
}
