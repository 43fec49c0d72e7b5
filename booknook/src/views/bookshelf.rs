//! Bookshelf state
//!
//! The loaded books plus the search box, the active tab and the book
//! whose detail view is open. Every list shown is derived on demand so
//! the tabs can never disagree with the books they count.

use crate::database::{Book, BookStatus};
use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShelfTab {
    #[default]
    All,
    Status(BookStatus),
}

impl ShelfTab {
    /// Tabs in display order
    pub fn all() -> impl Iterator<Item = ShelfTab> {
        std::iter::once(ShelfTab::All).chain(BookStatus::ALL.into_iter().map(ShelfTab::Status))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Status(status) => status.label(),
        }
    }

    fn matches(self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => book.status == Some(status),
        }
    }
}

impl fmt::Display for ShelfTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(status) => status.fmt(f),
        }
    }
}

impl FromStr for ShelfTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Status),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookshelfView {
    books: Vec<Book>,
    pub search: String,
    pub tab: ShelfTab,
    selected: Option<String>,
}

impl BookshelfView {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            ..Self::default()
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Books whose title or author contains the search text, ignoring case
    pub fn filtered(&self) -> Vec<&Book> {
        let needle = self.search.trim().to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                needle.is_empty()
                    || b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Filtered books with the given status
    pub fn by_status(&self, status: BookStatus) -> Vec<&Book> {
        self.filtered()
            .into_iter()
            .filter(|b| b.status == Some(status))
            .collect()
    }

    /// Each tab with the number of filtered books it shows
    pub fn tab_counts(&self) -> Vec<(ShelfTab, usize)> {
        let filtered = self.filtered();
        ShelfTab::all()
            .map(|tab| (tab, filtered.iter().filter(|b| tab.matches(b)).count()))
            .collect()
    }

    /// Books shown under the active tab
    pub fn visible(&self) -> Vec<&Book> {
        self.filtered()
            .into_iter()
            .filter(|b| self.tab.matches(b))
            .collect()
    }

    /// Open the detail view; unknown ids leave it closed
    pub fn select(&mut self, id: &str) -> Option<&Book> {
        self.selected = self.books.iter().any(|b| b.id == id).then(|| id.to_string());
        self.selected()
    }

    pub fn selected(&self) -> Option<&Book> {
        let id = self.selected.as_deref()?;
        self.books.iter().find(|b| b.id == id)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Drop a deleted book, closing its detail view if open
    pub fn remove(&mut self, id: &str) -> Option<Book> {
        let index = self.books.iter().position(|b| b.id == id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Some(self.books.remove(index))
    }

    /// Swap in an updated copy of a book
    pub fn replace(&mut self, book: Book) {
        if let Some(slot) = self.books.iter_mut().find(|b| b.id == book.id) {
            *slot = book;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(id: &str, title: &str, author: &str, status: Option<BookStatus>) -> Book {
        Book {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            author: author.to_string(),
            cover_url: None,
            isbn: None,
            genre: None,
            pages: None,
            date_read: None,
            rating: None,
            review: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn shelf() -> BookshelfView {
        BookshelfView::new(vec![
            book("1", "Dune", "Frank Herbert", Some(BookStatus::Read)),
            book("2", "Children of Dune", "Frank Herbert", Some(BookStatus::Reading)),
            book("3", "Circe", "Madeline Miller", Some(BookStatus::WantToRead)),
            book("4", "Emma", "Jane Austen", Some(BookStatus::Read)),
            book("5", "Legacy Row", "Unknown", None),
        ])
    }

    #[test]
    fn test_tabs_show_matching_subset() {
        let mut view = shelf();

        for status in BookStatus::ALL {
            view.tab = ShelfTab::Status(status);
            let visible = view.visible();
            assert!(visible.iter().all(|b| b.status == Some(status)));
            assert_eq!(visible.len(), view.by_status(status).len());
        }

        view.tab = ShelfTab::All;
        assert_eq!(view.visible().len(), 5);
    }

    #[test]
    fn test_tab_counts_equal_subset_sizes() {
        let mut view = shelf();
        view.search = "dune".to_string();

        let counts = view.tab_counts();
        assert_eq!(
            counts,
            vec![
                (ShelfTab::All, 2),
                (ShelfTab::Status(BookStatus::Read), 1),
                (ShelfTab::Status(BookStatus::Reading), 1),
                (ShelfTab::Status(BookStatus::WantToRead), 0),
            ]
        );

        for (tab, count) in counts {
            view.tab = tab;
            assert_eq!(view.visible().len(), count);
        }
    }

    #[test]
    fn test_search_matches_author_case_insensitively() {
        let mut view = shelf();
        view.search = "MILLER".to_string();
        let titles: Vec<_> = view.filtered().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Circe"]);
    }

    #[test]
    fn test_remove_closes_detail() {
        let mut view = shelf();
        assert_eq!(view.select("3").unwrap().title, "Circe");

        let removed = view.remove("3").unwrap();
        assert_eq!(removed.id, "3");
        assert!(view.selected().is_none());
        assert_eq!(view.books().len(), 4);
        assert!(view.books().iter().all(|b| b.id != "3"));
    }

    #[test]
    fn test_remove_other_keeps_detail() {
        let mut view = shelf();
        view.select("1");
        view.remove("4");
        assert_eq!(view.selected().unwrap().id, "1");
        assert!(view.remove("missing").is_none());
    }

    #[test]
    fn test_select_unknown() {
        let mut view = shelf();
        assert!(view.select("nope").is_none());
        view.select("2");
        view.close_detail();
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("all".parse::<ShelfTab>().unwrap(), ShelfTab::All);
        assert_eq!(
            "want-to-read".parse::<ShelfTab>().unwrap(),
            ShelfTab::Status(BookStatus::WantToRead)
        );
        assert!("finished".parse::<ShelfTab>().is_err());
        assert_eq!(ShelfTab::Status(BookStatus::WantToRead).label(), "Want to Read");
    }
}
