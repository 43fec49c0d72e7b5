//! Bookshelf and add-book commands

use super::display::{book_row, search_row, separator, stars};
use super::{emit, failed, AddArgs, Report};
use crate::app::AppState;
use crate::config::ADD_BOOK_SEARCH_LIMIT;
use crate::database::{Book, BookStatus};
use crate::error::{AppError, Result};
use crate::metadata::describe;
use crate::store::Session;
use crate::views::{AddBookForm, BookDetail, BookshelfView, DescriptionState, ShelfTab, Toast};
use std::io::Write;

/// Find a book by full id or unique id prefix
pub fn find_book<'a>(books: &'a [Book], id: &str) -> Result<&'a Book> {
    if let Some(book) = books.iter().find(|b| b.id == id) {
        return Ok(book);
    }

    let mut matches = books.iter().filter(|b| b.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(book), None) if !id.is_empty() => Ok(book),
        (Some(_), Some(_)) => Err(AppError::Validation(format!(
            "Id prefix {} matches more than one book",
            id
        ))),
        _ => Err(AppError::BookNotFound(id.to_string())),
    }
}

async fn load_shelf(
    state: &AppState,
    session: &Session,
) -> std::result::Result<BookshelfView, Toast> {
    state
        .books
        .list(session)
        .await
        .map(BookshelfView::new)
        .map_err(|e| failed("Loading books", &e, Toast::error("Failed to load your books")))
}

fn lookup_failed(error: AppError) -> Toast {
    match error {
        AppError::BookNotFound(id) => {
            Toast::destructive("Book not found", format!("No book with id {}", id))
        }
        other => Toast::destructive("Error", other.to_string()),
    }
}

pub async fn shelf<W: Write>(
    state: &AppState,
    session: &Session,
    tab: &str,
    search: Option<&str>,
    out: &mut W,
) -> Report {
    let tab: ShelfTab = tab
        .parse()
        .map_err(|e: AppError| Toast::destructive("Unknown tab", e.to_string()))?;

    let mut view = load_shelf(state, session).await?;
    view.tab = tab;
    view.search = search.unwrap_or_default().to_string();

    emit(out, format!("My Bookshelf: {} books in your collection", view.books().len()))?;
    let counts = view
        .tab_counts()
        .into_iter()
        .map(|(tab, count)| {
            let marker = if tab == view.tab { "*" } else { "" };
            format!("{}{} ({})", marker, tab.label(), count)
        })
        .collect::<Vec<_>>()
        .join("  ");
    emit(out, counts)?;
    emit(out, separator(90))?;

    let visible = view.visible();
    if visible.is_empty() {
        emit(out, "No books here yet. Add one with 'booknook add'.")?;
    }
    for book in visible {
        emit(out, book_row(book))?;
    }

    Ok(None)
}

pub async fn show<W: Write>(state: &AppState, session: &Session, id: &str, out: &mut W) -> Report {
    let mut view = load_shelf(state, session).await?;
    let id = find_book(view.books(), id).map_err(lookup_failed)?.id.clone();
    let Some(book) = view.select(&id).cloned() else {
        return Err(lookup_failed(AppError::BookNotFound(id)));
    };

    let mut detail = BookDetail::open(book);
    let result = describe(state.metadata.as_ref(), &detail.book).await;
    detail.finish(result);

    let book = &detail.book;
    emit(out, &book.title)?;
    emit(out, format!("by {}", book.author))?;
    if let Some(status) = book.status {
        emit(out, format!("Status:    {}", status.label()))?;
    }
    if let Some(genre) = &book.genre {
        emit(out, format!("Genre:     {}", genre))?;
    }
    if book.rating.is_some() {
        emit(out, format!("Rating:    {}", stars(book.rating)))?;
    }
    if let Some(pages) = book.pages {
        emit(out, format!("Pages:     {}", pages))?;
    }
    if let Some(date) = book.date_read {
        emit(out, format!("Read on:   {}", date.format("%B %-d, %Y")))?;
    }
    if let Some(isbn) = &book.isbn {
        emit(out, format!("ISBN:      {}", isbn))?;
    }
    if let Some(cover) = &book.cover_url {
        emit(out, format!("Cover:     {}", cover))?;
    }
    if let Some(review) = &book.review {
        emit(out, "")?;
        emit(out, format!("My review: {}", review))?;
    }

    emit(out, "")?;
    match &detail.description {
        DescriptionState::Loaded(text) | DescriptionState::Failed(text) => emit(out, text)?,
        DescriptionState::Idle | DescriptionState::Loading => {}
    }

    view.close_detail();
    Ok(None)
}

pub async fn delete<W: Write>(
    state: &AppState,
    session: &Session,
    id: &str,
    out: &mut W,
) -> Report {
    let mut view = load_shelf(state, session).await?;
    let book = find_book(view.books(), id).map_err(lookup_failed)?.clone();
    view.select(&book.id);

    state
        .books
        .delete(session, &book.id)
        .await
        .map_err(|e| failed("Deleting book", &e, Toast::book_delete_failed()))?;

    view.remove(&book.id);
    emit(out, format!("Removed {} ({} books left)", book.title, view.books().len()))?;
    Ok(Some(Toast::book_deleted()))
}

pub async fn set_status<W: Write>(
    state: &AppState,
    session: &Session,
    id: &str,
    status: &str,
    out: &mut W,
) -> Report {
    let status: BookStatus = status
        .parse()
        .map_err(|e: AppError| Toast::destructive("Unknown status", e.to_string()))?;

    let mut view = load_shelf(state, session).await?;
    let id = find_book(view.books(), id).map_err(lookup_failed)?.id.clone();

    let updated = state
        .books
        .set_status(session, &id, status)
        .await
        .map_err(|e| failed("Updating status", &e, Toast::error("Failed to update book")))?;

    emit(out, book_row(&updated))?;
    let toast = Toast::status_updated(&updated.title, status.label());
    view.replace(updated);
    Ok(Some(toast))
}

pub async fn search<W: Write>(state: &AppState, query: &str, limit: u32, out: &mut W) -> Report {
    let results = state
        .metadata
        .search(query, limit)
        .await
        .map_err(|e| failed("Searching", &e, Toast::search_failed()))?;

    if results.is_empty() {
        emit(out, format!("No results for {:?}", query))?;
        return Ok(None);
    }

    for (index, result) in results.iter().enumerate() {
        emit(out, search_row(index, result))?;
    }
    emit(out, "")?;
    emit(out, format!("Add one with: booknook add --from-search {:?} --pick N", query))?;
    Ok(None)
}

pub async fn add<W: Write>(
    state: &AppState,
    session: &Session,
    args: AddArgs,
    out: &mut W,
) -> Report {
    let mut form = AddBookForm::new();

    if let Some(query) = args.from_search.as_deref() {
        form.search_query = query.to_string();
        form.search_results = state
            .metadata
            .search(query, ADD_BOOK_SEARCH_LIMIT)
            .await
            .map_err(|e| failed("Searching", &e, Toast::search_failed()))?;

        let Some(result) = args
            .pick
            .checked_sub(1)
            .and_then(|i| form.search_results.get(i))
            .cloned()
        else {
            return Err(Toast::destructive(
                "No such result",
                format!(
                    "The search returned {} results; pick 1 to {}",
                    form.search_results.len(),
                    form.search_results.len()
                ),
            ));
        };
        form.apply_search_result(&result, state.metadata.covers_base());
    }

    apply_args(&mut form, args)?;

    if form.missing_required() {
        return Err(Toast::missing_book_fields());
    }
    let book = form
        .validate()
        .map_err(|e| Toast::destructive("Invalid book", e.to_string()))?;

    let created = state
        .books
        .add(session, book)
        .await
        .map_err(|e| failed("Adding book", &e, Toast::book_add_failed()))?;

    emit(out, book_row(&created))?;
    Ok(Some(Toast::book_added(&created.title)))
}

fn apply_args(form: &mut AddBookForm, args: AddArgs) -> std::result::Result<(), Toast> {
    let set = |field: &mut String, value: Option<String>| {
        if let Some(value) = value {
            *field = value;
        }
    };

    set(&mut form.title, args.title);
    set(&mut form.author, args.author);
    set(&mut form.cover_url, args.cover_url);
    set(&mut form.isbn, args.isbn);
    set(&mut form.genre, args.genre);
    set(&mut form.pages, args.pages);
    set(&mut form.review, args.review);
    set(&mut form.date_read, args.date_read);

    if let Some(rating) = args.rating {
        form.set_rating(rating);
    }
    form.status = args
        .status
        .parse()
        .map_err(|e: AppError| Toast::destructive("Unknown status", e.to_string()))?;

    Ok(())
}
