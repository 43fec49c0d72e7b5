//! View state
//!
//! Page state for each screen of the application, free of I/O. Commands
//! load data through the services, drive these types and render them.

pub mod add_book;
pub mod book_detail;
pub mod bookshelf;
pub mod dashboard;
pub mod journal;
pub mod notification;
pub mod recommender;
pub mod routes;

pub use add_book::AddBookForm;
pub use book_detail::{BookDetail, DescriptionState};
pub use bookshelf::{BookshelfView, ShelfTab};
pub use dashboard::DashboardSnapshot;
pub use journal::{book_title_for, JournalEditor, JournalView};
pub use notification::{Toast, ToastVariant};
pub use recommender::{RecommendMode, RecommenderView};
pub use routes::{resolve, Icon, NavItem, Route, NAV_ITEMS};
