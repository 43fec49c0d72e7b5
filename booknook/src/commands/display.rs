//! Formatting helpers for command output
//!
//! Format-only: everything here turns already-computed state into text.

use crate::database::{Book, JournalEntry};
use crate::metadata::SearchResult;
use crate::services::Recommendation;
use crate::stickers::{emojis, parse_content};

/// Characters of an id shown in listings; any unique prefix is accepted back
pub const SHORT_ID: usize = 8;

/// Truncates a string to a maximum number of characters, adding "..." if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Filled and empty stars, or blank when unrated
pub fn stars(rating: Option<i32>) -> String {
    match rating {
        Some(r) => {
            let r = r.clamp(0, 5) as usize;
            format!("{}{}", "★".repeat(r), "☆".repeat(5 - r))
        }
        None => String::new(),
    }
}

/// One bookshelf row
pub fn book_row(book: &Book) -> String {
    let status = book.status.map(|s| s.label()).unwrap_or("--");
    format!(
        "{:<9} {:<32} {:<24} {:<13} {}",
        short_id(&book.id),
        truncate_string(&book.title, 31),
        truncate_string(&book.author, 23),
        status,
        stars(book.rating)
    )
}

/// One search result row, numbered from 1
pub fn search_row(index: usize, result: &SearchResult) -> String {
    let year = result
        .first_publish_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let authors = result.authors();
    let authors = if authors.is_empty() {
        "Unknown author".to_string()
    } else {
        authors
    };
    format!(
        "{:>2}. {} ({}) by {}",
        index + 1,
        truncate_string(&result.title, 48),
        year,
        truncate_string(&authors, 32)
    )
}

/// Journal entry header line plus its visible text
pub fn entry_block(entry: &JournalEntry, book_title: Option<&str>) -> String {
    let parsed = parse_content(&entry.content);
    let mut header = format!(
        "{}  {}  {}",
        short_id(&entry.id),
        entry.created_at.format("%Y-%m-%d"),
        entry.title
    );
    if let Some(title) = book_title {
        header.push_str(&format!("  [{}]", title));
    }
    if !parsed.stickers.is_empty() {
        header.push_str(&format!("  {}", emojis(&parsed.stickers)));
    }
    format!("{}\n    {}", header, parsed.text.replace('\n', "\n    "))
}

/// One recommendation, numbered from 1
pub fn recommendation_block(index: usize, rec: &Recommendation) -> String {
    let mut block = format!("{:>2}. {} by {}", index + 1, rec.title, rec.author);
    if !rec.reason.is_empty() {
        block.push_str(&format!("\n    {}", rec.reason));
    }
    if let Some(url) = &rec.cover_url {
        block.push_str(&format!("\n    cover: {}", url));
    }
    block
}
