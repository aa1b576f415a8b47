//! Book command handlers

use anyhow::Result;

use readstack_core::{filter_counts, filtered_view, BookDraft, Category, Filter, Status};

use super::{book_error, resolve_id, LibraryStore};
use crate::editor::{confirm, edit_notes, is_interactive, prompt_with_default};
use crate::output::Output;

/// Add a new book
pub fn add(
    store: &mut LibraryStore,
    title: String,
    author: String,
    category: Category,
    status: Status,
    notes: Option<String>,
    output: &Output,
) -> Result<()> {
    let draft = BookDraft::new(title, author)
        .category(category)
        .status(status)
        .notes(notes.unwrap_or_default());

    let book = store.add(&draft).map_err(|e| book_error(e, "Failed to add book"))?;

    output.success("Book added successfully!");
    output.print_book(&book);

    Ok(())
}

/// List books under a filter
pub fn list(store: &LibraryStore, filter: Filter, output: &Output) -> Result<()> {
    let books = filtered_view(store.books(), filter);
    let counts = filter_counts(store.books());
    output.print_books(&books, filter, &counts);
    Ok(())
}

/// Show a single book
pub fn show(store: &LibraryStore, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(store, &id)?;
    let book = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    output.print_book(book);
    Ok(())
}

/// Values given on the command line for `edit`
#[derive(Debug, Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub author: Option<String>,
    pub notes: Option<String>,
    pub category: Option<Category>,
    pub use_editor: bool,
}

impl EditArgs {
    fn has_text_changes(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.notes.is_some() || self.use_editor
    }
}

/// Edit a book
///
/// Fields not given on the command line are prompted for when running
/// interactively, with the current value as default.
pub fn edit(store: &mut LibraryStore, id: String, args: EditArgs, output: &Output) -> Result<()> {
    let id = resolve_id(store, &id)?;
    let current = store
        .get(&id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    let prompt = !args.has_text_changes() && args.category.is_none() && is_interactive();
    if prompt {
        println!("Editing book: {}", current.id);
        println!("Press Enter to keep current value, or type new value.\n");
    }

    let title = match args.title {
        Some(title) => title,
        None if prompt => prompt_with_default("Title", &current.title)?,
        None => current.title.clone(),
    };
    let author = match args.author {
        Some(author) => author,
        None if prompt => prompt_with_default("Author", &current.author)?,
        None => current.author.clone(),
    };
    let notes = match args.notes {
        Some(notes) => notes,
        None if args.use_editor => edit_notes(&current)?,
        None if prompt => prompt_with_default("Notes", &current.notes)?,
        None => current.notes.clone(),
    };

    let mut book = store
        .edit(&id, &title, &author, &notes)
        .map_err(|e| book_error(e, "Failed to update book"))?;

    if let Some(category) = args.category {
        book = store
            .set_category(&id, category)
            .map_err(|e| book_error(e, "Failed to update category"))?;
    }

    output.success("Book updated successfully!");
    output.print_book(&book);

    Ok(())
}

/// Change the reading status of a book
pub fn set_status(
    store: &mut LibraryStore,
    id: String,
    status: Status,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(store, &id)?;
    let book = store
        .set_status(&id, status)
        .map_err(|e| book_error(e, "Failed to update status"))?;

    output.success(&format!("Marked as {}!", status.display_name()));
    output.print_book(&book);

    Ok(())
}

/// Delete a book
pub fn delete(store: &mut LibraryStore, id: String, force: bool, output: &Output) -> Result<()> {
    let id = resolve_id(store, &id)?;

    if !force && output.should_prompt() {
        if let Some(book) = store.get(&id) {
            println!("Delete \"{}\" by {}?", book.title, book.author);
            println!("This action cannot be undone.");
            if !confirm("Are you sure?")? {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    match store.delete(&id).map_err(|e| book_error(e, "Failed to delete book"))? {
        Some(_) => output.success("Book deleted successfully!"),
        None => output.message(&format!("No book with ID {}", id)),
    }

    Ok(())
}
