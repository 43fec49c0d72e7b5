//! Command-line front end
//!
//! Each subcommand stands in for one page of the application:
//! - `auth`: sign in, sign up, sign out
//! - `dashboard`: reading summary
//! - `books`: bookshelf, detail, add, delete, status, search
//! - `journal`: entry list and editor
//! - `recommend`: recommendation sessions
//!
//! Handlers write their output to the given writer and finish with a
//! [`Report`]: an optional success toast, or the failure toast to show.

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod display;
pub mod journal;
pub mod recommend;

use crate::app::AppState;
use crate::error::AppError;
use crate::store::Session;
use crate::views::{resolve, Route, Toast, NAV_ITEMS};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Outcome of a command: a success toast (if any) or the failure toast
pub type Report = std::result::Result<Option<Toast>, Toast>;

/// Track books, keep a reading journal and get recommendations
#[derive(Parser, Debug)]
#[command(name = "booknook")]
#[command(about = "A cozy personal book tracker")]
#[command(version)]
pub struct Cli {
    /// Directory holding settings, session and the local database
    #[arg(long = "data-dir", env = "BOOKNOOK_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign up or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Show the reading dashboard
    Dashboard,

    /// List the bookshelf
    Shelf {
        /// Tab: all, read, reading or want-to-read
        #[arg(short, long, default_value = "all")]
        tab: String,
        /// Only books whose title or author contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one book with its description
    Show {
        /// Book id (a unique prefix is enough)
        id: String,
    },

    /// Delete a book
    Delete {
        /// Book id (a unique prefix is enough)
        id: String,
    },

    /// Move a book to another status
    Status {
        /// Book id (a unique prefix is enough)
        id: String,
        /// reading, read or want-to-read
        status: String,
    },

    /// Search Open Library
    Search {
        query: String,
        #[arg(short, long, default_value_t = crate::config::ADD_BOOK_SEARCH_LIMIT)]
        limit: u32,
    },

    /// Add a book, typed in or picked from a search
    Add(AddArgs),

    /// Read and write journal entries
    Journal {
        #[command(subcommand)]
        command: JournalCommand,
    },

    /// Get AI book recommendations
    Recommend {
        /// bookshelf, genre or custom
        #[arg(short, long, default_value = "bookshelf")]
        mode: String,
        /// Genre for genre mode
        #[arg(short, long)]
        genre: Option<String>,
        /// Free-form request for custom mode
        #[arg(short, long)]
        prompt: Option<String>,
        /// Add these results (1-based) to the want-to-read list
        #[arg(short, long, num_args = 1..)]
        accept: Vec<usize>,
    },

    /// Set the yearly reading goal
    Goal {
        books: u32,
    },

    /// List pages, or show where a path leads
    Routes {
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in with email and password
    SignIn {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BOOKNOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    SignUp {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BOOKNOOK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short = 'n', long)]
        display_name: Option<String>,
    },
    /// End the current session
    SignOut,
    /// Show who is signed in
    Whoami,
}

/// Book fields for `add`; explicit values win over a picked search result
#[derive(Args, Debug, Default)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub author: Option<String>,
    #[arg(long)]
    pub cover_url: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(short, long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub pages: Option<String>,
    /// 1-5 stars, 0 for none
    #[arg(short, long)]
    pub rating: Option<i32>,
    #[arg(long)]
    pub review: Option<String>,
    #[arg(short, long, default_value = "read")]
    pub status: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date_read: Option<String>,
    /// Pre-fill from an Open Library search
    #[arg(long = "from-search")]
    pub from_search: Option<String>,
    /// Which search result to use (1-based)
    #[arg(long, default_value_t = 1)]
    pub pick: usize,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// List entries, newest first
    List,
    /// Write a new entry
    New(EntryArgs),
    /// Edit an entry; stickers given here are toggled
    Edit {
        /// Entry id (a unique prefix is enough)
        id: String,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete an entry
    Delete {
        /// Entry id (a unique prefix is enough)
        id: String,
    },
    /// Show the sticker catalog
    Stickers,
}

#[derive(Args, Debug, Default)]
pub struct EntryArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short = 'x', long)]
    pub text: Option<String>,
    /// Linked book id, or "none"
    #[arg(short, long)]
    pub book: Option<String>,
    /// Sticker id; repeat for more
    #[arg(short, long = "sticker")]
    pub stickers: Vec<String>,
}

impl Commands {
    /// The page this command belongs to
    pub fn route(&self) -> Route {
        match self {
            Self::Auth { .. } => Route::Auth,
            Self::Dashboard | Self::Goal { .. } => Route::Dashboard,
            Self::Shelf { .. } | Self::Show { .. } | Self::Delete { .. } | Self::Status { .. } => {
                Route::Bookshelf
            }
            Self::Search { .. } | Self::Add(_) => Route::AddBook,
            Self::Journal { .. } => Route::Journal,
            Self::Recommend { .. } => Route::Recommender,
            Self::Routes { .. } => Route::Landing,
        }
    }
}

/// Run one command against the application state
pub async fn run<W: Write>(state: &AppState, command: Commands, out: &mut W) -> Report {
    let route = command.route();
    tracing::debug!("Running command on {}", route);

    let landing = resolve(route, state.auth.is_signed_in().await);
    if landing == Route::Auth && route != Route::Auth {
        tracing::info!("{} needs a session, redirecting to {}", route, landing);
        return Err(Toast::sign_in_required());
    }

    match command {
        Commands::Auth { command } => auth::run(state, command, out).await,
        Commands::Dashboard => {
            let session = require_session(state).await?;
            dashboard::show(state, &session, out).await
        }
        Commands::Goal { books } => dashboard::set_goal(state, books, out).await,
        Commands::Shelf { tab, search } => {
            let session = require_session(state).await?;
            books::shelf(state, &session, &tab, search.as_deref(), out).await
        }
        Commands::Show { id } => {
            let session = require_session(state).await?;
            books::show(state, &session, &id, out).await
        }
        Commands::Delete { id } => {
            let session = require_session(state).await?;
            books::delete(state, &session, &id, out).await
        }
        Commands::Status { id, status } => {
            let session = require_session(state).await?;
            books::set_status(state, &session, &id, &status, out).await
        }
        Commands::Search { query, limit } => {
            require_session(state).await?;
            books::search(state, &query, limit, out).await
        }
        Commands::Add(args) => {
            let session = require_session(state).await?;
            books::add(state, &session, args, out).await
        }
        Commands::Journal { command } => {
            let session = require_session(state).await?;
            journal::run(state, &session, command, out).await
        }
        Commands::Recommend {
            mode,
            genre,
            prompt,
            accept,
        } => {
            let session = require_session(state).await?;
            let options = recommend::Options {
                mode,
                genre,
                prompt,
                accept,
            };
            recommend::run(state, &session, options, out).await
        }
        Commands::Routes { path } => routes(state, path.as_deref(), out).await,
    }
}

/// The current session, or the toast telling the user to sign in
pub async fn require_session(state: &AppState) -> std::result::Result<Session, Toast> {
    state
        .auth
        .require_session()
        .await
        .map_err(|_| Toast::sign_in_required())
}

/// Log a failed action and hand back the toast to show for it
pub fn failed(action: &str, error: &AppError, toast: Toast) -> Toast {
    tracing::error!("{} failed: {}", action, error);
    toast
}

/// Write a line, turning a broken pipe into a failure toast
pub fn emit<W: Write>(out: &mut W, line: impl std::fmt::Display) -> std::result::Result<(), Toast> {
    writeln!(out, "{}", line).map_err(|e| {
        failed(
            "Writing output",
            &AppError::Io(e),
            Toast::error("Could not write output"),
        )
    })
}

async fn routes<W: Write>(state: &AppState, path: Option<&str>, out: &mut W) -> Report {
    let signed_in = state.auth.is_signed_in().await;

    match path {
        Some(path) => {
            let route = Route::from_path(path).ok_or_else(|| {
                Toast::destructive("Page not found", format!("No page at {}", path))
            })?;
            emit(out, format!("{} -> {}", route, resolve(route, signed_in)))?;
        }
        None => {
            for item in NAV_ITEMS {
                emit(out, format!("{:<16} {}", item.title, item.route))?;
            }
        }
    }

    Ok(None)
}
