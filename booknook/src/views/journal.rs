//! Journal list and entry editor

use crate::config::NO_BOOK_SENTINEL;
use crate::database::{Book, JournalEntry};
use crate::error::{AppError, Result};
use crate::services::JournalDraft;
use crate::stickers::{parse_content, StickerSelection};

/// State of the new/edit entry dialog
#[derive(Debug, Clone, Default)]
pub struct JournalEditor {
    pub open: bool,
    /// Entry being edited; `None` when composing a new one
    pub editing: Option<String>,
    pub title: String,
    pub text: String,
    /// A book id, or [`NO_BOOK_SENTINEL`]
    pub book_selection: String,
    pub stickers: StickerSelection,
}

impl JournalEditor {
    pub fn new() -> Self {
        Self {
            book_selection: NO_BOOK_SENTINEL.to_string(),
            ..Self::default()
        }
    }

    /// Reset and open for a new entry
    pub fn open_new(&mut self) {
        *self = Self::new();
        self.open = true;
    }

    /// Open with an existing entry, splitting its stickers back out
    pub fn open_edit(&mut self, entry: &JournalEntry) {
        let parsed = parse_content(&entry.content);
        *self = Self {
            open: true,
            editing: Some(entry.id.clone()),
            title: entry.title.clone(),
            text: parsed.text,
            book_selection: entry
                .book_id
                .clone()
                .unwrap_or_else(|| NO_BOOK_SENTINEL.to_string()),
            stickers: StickerSelection::from_ids(parsed.stickers),
        };
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Add or remove a sticker; returns false when the selection is full
    pub fn toggle_sticker(&mut self, id: &str) -> bool {
        self.stickers.toggle(id)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The draft to save, if the title and text are filled in
    pub fn submit(&self) -> Result<JournalDraft> {
        if self.title.trim().is_empty() || self.text.trim().is_empty() {
            return Err(AppError::Validation(
                "Please fill in the title and your thoughts!".to_string(),
            ));
        }

        let book_id = match self.book_selection.trim() {
            "" => None,
            id if id == NO_BOOK_SENTINEL => None,
            id => Some(id.to_string()),
        };

        Ok(JournalDraft {
            title: self.title.clone(),
            text: self.text.clone(),
            book_id,
            stickers: self.stickers.ids().to_vec(),
        })
    }
}

/// Title of the book an entry is linked to, if it is still on the shelf
pub fn book_title_for<'a>(entry: &JournalEntry, books: &'a [Book]) -> Option<&'a str> {
    let id = entry.book_id.as_deref()?;
    books.iter().find(|b| b.id == id).map(|b| b.title.as_str())
}

/// The journal page: entries (newest first), the user's books and the editor
#[derive(Debug, Clone, Default)]
pub struct JournalView {
    pub entries: Vec<JournalEntry>,
    pub books: Vec<Book>,
    pub editor: JournalEditor,
}

impl JournalView {
    pub fn new(entries: Vec<JournalEntry>, books: Vec<Book>) -> Self {
        Self {
            entries,
            books,
            editor: JournalEditor::new(),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<JournalEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn book_title(&self, entry: &JournalEntry) -> Option<&str> {
        book_title_for(entry, &self.books)
    }
}
