//! Dashboard commands

use super::display::book_row;
use super::{emit, failed, Report};
use crate::app::AppState;
use crate::store::Session;
use crate::views::{DashboardSnapshot, Toast};
use std::io::Write;

pub async fn show<W: Write>(state: &AppState, session: &Session, out: &mut W) -> Report {
    let snapshot = state
        .dashboard
        .load(session, state.settings.reading.yearly_goal)
        .await
        .map_err(|e| {
            failed("Loading dashboard", &e, Toast::error("Failed to load your dashboard"))
        })?;

    emit(out, DashboardSnapshot::greeting(session.greeting_name()))?;
    emit(out, "")?;
    emit(out, format!("Books Read         {}", snapshot.total_books))?;
    emit(out, format!("Currently Reading  {}", snapshot.currently_reading))?;
    emit(out, format!("Average Rating     {}", snapshot.average_rating))?;
    emit(out, format!("Journal Entries    {}", snapshot.journal_count))?;
    emit(out, "")?;
    emit(
        out,
        format!(
            "Reading goal: {}/{} ({}%)",
            snapshot.total_books, snapshot.goal, snapshot.goal_progress_percent
        ),
    )?;
    emit(out, snapshot.encouragement())?;

    if !snapshot.recent.is_empty() {
        emit(out, "")?;
        emit(out, "Recent books:")?;
        for book in &snapshot.recent {
            emit(out, book_row(book))?;
        }
    }

    Ok(None)
}

pub async fn set_goal<W: Write>(state: &AppState, books: u32, out: &mut W) -> Report {
    state
        .settings_service()
        .update_reading_goal(books)
        .await
        .map_err(|e| failed("Updating goal", &e, Toast::error(e.to_string())))?;

    emit(out, format!("Yearly goal set to {} books", books))?;
    Ok(Some(Toast::info("Goal updated", None)))
}
