//! Journal commands

use super::books::find_book;
use super::display::{entry_block, short_id};
use super::{emit, failed, EntryArgs, JournalCommand, Report};
use crate::app::AppState;
use crate::config::{MAX_STICKERS, NO_BOOK_SENTINEL};
use crate::database::{Book, JournalEntry};
use crate::error::{AppError, Result};
use crate::stickers::{self, StickerCategory};
use crate::store::Session;
use crate::views::{JournalEditor, JournalView, Toast};
use std::io::Write;

pub async fn run<W: Write>(
    state: &AppState,
    session: &Session,
    command: JournalCommand,
    out: &mut W,
) -> Report {
    match command {
        JournalCommand::List => list(state, session, out).await,
        JournalCommand::New(entry) => create(state, session, entry, out).await,
        JournalCommand::Edit { id, entry } => edit(state, session, &id, entry, out).await,
        JournalCommand::Delete { id } => delete(state, session, &id, out).await,
        JournalCommand::Stickers => catalog(out),
    }
}

/// Find an entry by full id or unique id prefix
pub fn find_entry<'a>(entries: &'a [JournalEntry], id: &str) -> Result<&'a JournalEntry> {
    if let Some(entry) = entries.iter().find(|e| e.id == id) {
        return Ok(entry);
    }

    let mut matches = entries.iter().filter(|e| e.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) if !id.is_empty() => Ok(entry),
        (Some(_), Some(_)) => Err(AppError::Validation(format!(
            "Id prefix {} matches more than one entry",
            id
        ))),
        _ => Err(AppError::EntryNotFound(id.to_string())),
    }
}

async fn load(state: &AppState, session: &Session) -> std::result::Result<JournalView, Toast> {
    let (entries, books) = tokio::try_join!(state.journal.list(session), state.books.list(session))
        .map_err(|e| failed("Loading journal", &e, Toast::error("Failed to load your journal")))?;
    Ok(JournalView::new(entries, books))
}

async fn list<W: Write>(state: &AppState, session: &Session, out: &mut W) -> Report {
    let view = load(state, session).await?;

    if view.entries.is_empty() {
        emit(out, "Your journal is empty. Start with 'booknook journal new'.")?;
        return Ok(None);
    }

    for entry in &view.entries {
        emit(out, entry_block(entry, view.book_title(entry)))?;
        emit(out, "")?;
    }
    Ok(None)
}

async fn create<W: Write>(
    state: &AppState,
    session: &Session,
    args: EntryArgs,
    out: &mut W,
) -> Report {
    let view = load(state, session).await?;
    let mut editor = JournalEditor::new();
    editor.open_new();
    fill(&mut editor, args, &view.books)?;

    let draft = editor.submit().map_err(|_| Toast::journal_incomplete())?;
    let entry = state
        .journal
        .create(session, &draft)
        .await
        .map_err(|e| failed("Creating entry", &e, Toast::entry_create_failed()))?;

    editor.close();
    emit(out, format!("Saved entry {}", short_id(&entry.id)))?;
    Ok(Some(Toast::entry_created()))
}

async fn edit<W: Write>(
    state: &AppState,
    session: &Session,
    id: &str,
    args: EntryArgs,
    out: &mut W,
) -> Report {
    let view = load(state, session).await?;
    let entry = find_entry(&view.entries, id).map_err(not_found)?;

    let mut editor = JournalEditor::new();
    editor.open_edit(entry);
    fill(&mut editor, args, &view.books)?;

    let Some(entry_id) = editor.editing.clone() else {
        return Err(not_found(AppError::EntryNotFound(id.to_string())));
    };
    let draft = editor.submit().map_err(|_| Toast::journal_incomplete())?;
    let updated = state
        .journal
        .update(session, &entry_id, &draft)
        .await
        .map_err(|e| failed("Updating entry", &e, Toast::entry_update_failed()))?;

    editor.close();
    emit(out, entry_block(&updated, crate::views::book_title_for(&updated, &view.books)))?;
    Ok(Some(Toast::entry_updated()))
}

async fn delete<W: Write>(state: &AppState, session: &Session, id: &str, out: &mut W) -> Report {
    let mut view = load(state, session).await?;
    let entry_id = find_entry(&view.entries, id).map_err(not_found)?.id.clone();

    state
        .journal
        .delete(session, &entry_id)
        .await
        .map_err(|e| failed("Deleting entry", &e, Toast::entry_delete_failed()))?;

    view.remove(&entry_id);
    emit(out, format!("{} entries left", view.entries.len()))?;
    Ok(Some(Toast::entry_deleted()))
}

fn catalog<W: Write>(out: &mut W) -> Report {
    emit(out, format!("Pick up to {} stickers per entry", MAX_STICKERS))?;
    for category in StickerCategory::ALL {
        let line = stickers::in_category(category)
            .map(|s| format!("{} {}", s.emoji, s.id))
            .collect::<Vec<_>>()
            .join("  ");
        emit(out, format!("{} {:<9} {}", category.icon(), category.name(), line))?;
    }
    Ok(None)
}

/// Apply command-line fields to the editor; stickers are toggled in order.
/// A linked book must be one of `books`, given by full id or unique prefix.
fn fill(
    editor: &mut JournalEditor,
    args: EntryArgs,
    books: &[Book],
) -> std::result::Result<(), Toast> {
    if let Some(title) = args.title {
        editor.title = title;
    }
    if let Some(text) = args.text {
        editor.text = text;
    }
    if let Some(book) = args.book {
        editor.book_selection = match book.trim() {
            "" | NO_BOOK_SENTINEL => NO_BOOK_SENTINEL.to_string(),
            id => find_book(books, id).map_err(unknown_book)?.id.clone(),
        };
    }

    for id in &args.stickers {
        if stickers::find(id).is_none() {
            return Err(Toast::destructive(
                "Unknown sticker",
                format!("{} is not in the catalog (see 'booknook journal stickers')", id),
            ));
        }
        if !editor.toggle_sticker(id) {
            return Err(Toast::destructive(
                "Too many stickers",
                format!("An entry can carry at most {} stickers", MAX_STICKERS),
            ));
        }
    }

    Ok(())
}

fn unknown_book(error: AppError) -> Toast {
    match error {
        AppError::BookNotFound(id) => Toast::destructive(
            "Book not found",
            format!("No book with id {} on your bookshelf", id),
        ),
        other => Toast::destructive("Book not found", other.to_string()),
    }
}

fn not_found(error: AppError) -> Toast {
    match error {
        AppError::EntryNotFound(id) => {
            Toast::destructive("Entry not found", format!("No journal entry with id {}", id))
        }
        other => Toast::destructive("Error", other.to_string()),
    }
}
