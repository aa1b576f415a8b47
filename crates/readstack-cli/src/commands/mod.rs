//! Command handlers

pub mod book;
pub mod config;
pub mod shell;
pub mod stats;

use anyhow::{bail, Result};

use readstack_core::{BookError, BookId, PrefixMatch, Slot, Store};

/// The store as opened from configuration
pub type LibraryStore = Store<Box<dyn Slot>>;

/// Resolve a book ID (full ID or unique prefix)
pub fn resolve_id<S: Slot>(store: &Store<S>, id: &str) -> Result<BookId> {
    match store.find_by_prefix(id) {
        PrefixMatch::One(book) => Ok(book.id.clone()),
        PrefixMatch::None => bail!("No book found matching: {}", id),
        PrefixMatch::Many(matches) => {
            eprintln!("Multiple books match '{}':", id);
            for book in &matches {
                eprintln!("  {} - {} by {}", book.id, book.title, book.author);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Wrap a store error for the command line, appending a recovery hint
/// when the failure was a save
pub fn book_error(err: BookError, action: &str) -> anyhow::Error {
    let context = match err.recovery_suggestion() {
        Some(hint) => format!("{}. {}", action, hint),
        None => action.to_string(),
    };
    anyhow::Error::new(err).context(context)
}
