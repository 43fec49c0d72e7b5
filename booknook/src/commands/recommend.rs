//! Recommendation commands

use super::display::recommendation_block;
use super::{emit, failed, Report};
use crate::app::AppState;
use crate::config::recommendable_genres;
use crate::error::AppError;
use crate::store::Session;
use crate::views::{RecommendMode, RecommenderView, Toast};
use std::io::Write;

/// Parsed `recommend` arguments
#[derive(Debug, Default)]
pub struct Options {
    pub mode: String,
    pub genre: Option<String>,
    pub prompt: Option<String>,
    /// 1-based result numbers to add to the want-to-read list
    pub accept: Vec<usize>,
}

impl Options {
    fn into_view(self) -> std::result::Result<(RecommenderView, Vec<usize>), Toast> {
        let mode: RecommendMode = self
            .mode
            .parse()
            .map_err(|e: AppError| Toast::destructive("Unknown mode", e.to_string()))?;

        let view = RecommenderView {
            mode,
            genre: self.genre.unwrap_or_default(),
            custom_prompt: self.prompt.unwrap_or_default(),
            ..RecommenderView::default()
        };
        Ok((view, self.accept))
    }
}

pub async fn run<W: Write>(
    state: &AppState,
    session: &Session,
    options: Options,
    out: &mut W,
) -> Report {
    let (mut view, accept) = options.into_view()?;

    if !state.recommender.is_available() {
        return Err(Toast::destructive(
            "Recommendations unavailable",
            "Set BOOKNOOK_RECOMMEND_URL or use the supabase backend",
        ));
    }

    if view.mode == RecommendMode::Genre
        && !view.genre.trim().is_empty()
        && !recommendable_genres().any(|g| g.eq_ignore_ascii_case(view.genre.trim()))
    {
        tracing::warn!("Genre {:?} is not in the picker list", view.genre);
    }

    let books = state
        .books
        .list(session)
        .await
        .map_err(|e| failed("Loading books", &e, Toast::error("Failed to load your books")))?;

    if !view.can_submit(books.len()) {
        return Err(Toast::missing_input());
    }

    view.start();
    emit(out, "Finding books you'll love...")?;
    match state
        .recommender
        .recommend(Some(session), &view.request(), &books)
        .await
    {
        Ok(results) => view.finish(results),
        Err(e) => {
            view.fail();
            return Err(failed("Recommending", &e, Toast::recommendations_failed()));
        }
    }

    for (index, rec) in view.results.iter().enumerate() {
        emit(out, recommendation_block(index, rec))?;
    }

    let mut last = None;
    for index in picked(&accept, view.results.len())? {
        let rec = &view.results[index];
        state
            .books
            .accept_recommendation(session, rec)
            .await
            .map_err(|e| failed("Adding recommendation", &e, Toast::book_add_failed()))?;

        let toast = Toast::recommendation_added(&rec.title);
        if let Some(previous) = last.replace(toast) {
            emit(out, previous)?;
        }
    }

    Ok(last)
}

/// Zero-based indices for the accepted result numbers, in order and without
/// repeats. Any number outside `1..=available` rejects the whole list.
fn picked(accept: &[usize], available: usize) -> std::result::Result<Vec<usize>, Toast> {
    let mut indices = Vec::with_capacity(accept.len());
    for &number in accept {
        if number == 0 || number > available {
            return Err(Toast::destructive(
                "No such recommendation",
                format!("{} is not between 1 and {}", number, available),
            ));
        }
        if !indices.contains(&(number - 1)) {
            indices.push(number - 1);
        }
    }
    Ok(indices)
}
