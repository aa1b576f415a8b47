//! Record store
//!
//! The `Store` owns the in-memory collection and the slot it is persisted
//! to. The collection is loaded once when the store is opened and written
//! back in full after every successful mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open(MemorySlot::new(DEFAULT_SLOT));
//!
//! let book = store.add(&BookDraft::new("Dune", "Frank Herbert"))?;
//! store.edit(&book.id, "Dune", "Frank Herbert", "Great book")?;
//! store.delete(&book.id)?;
//! ```
//!
//! When a save fails the mutation is kept in memory and
//! `BookError::Persistence` is returned; read the record back with `get`.

use tracing::{debug, info, warn};

use crate::error::{validate_text, BookError, ValidationError};
use crate::models::{Book, BookDraft, BookId, Category, Status};
use crate::storage::{self, Slot, StorageError};

/// Owner of the book collection
pub struct Store<S: Slot> {
    /// Books in insertion order
    books: Vec<Book>,
    /// Where the collection is persisted
    slot: S,
}

/// Outcome of resolving an id prefix
#[derive(Debug, PartialEq, Eq)]
pub enum PrefixMatch<'a> {
    None,
    One(&'a Book),
    Many(Vec<&'a Book>),
}

impl<S: Slot> Store<S> {
    /// Open the store, loading whatever the slot holds
    ///
    /// Missing or malformed data yields an empty collection.
    pub fn open(slot: S) -> Self {
        let books = storage::load_collection(&slot);
        info!(slot = slot.name(), count = books.len(), "opened book store");
        Self { books, slot }
    }

    /// All books, in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Get a book by id
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    /// Resolve a full id or an id prefix
    pub fn find_by_prefix(&self, prefix: &str) -> PrefixMatch<'_> {
        if let Some(book) = self.books.iter().find(|b| b.id.as_str() == prefix) {
            return PrefixMatch::One(book);
        }

        let mut matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.id.as_str().starts_with(prefix))
            .collect();

        match matches.len() {
            0 => PrefixMatch::None,
            1 => PrefixMatch::One(matches.remove(0)),
            _ => PrefixMatch::Many(matches),
        }
    }

    /// The slot backing this store
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Mutable access to the slot
    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    // ==================== Mutations ====================

    /// Add a new book
    ///
    /// Validation runs in order and stops at the first failure: presence of
    /// title and author, their minimum length, then the case-insensitive
    /// duplicate check on (title, author).
    pub fn add(&mut self, draft: &BookDraft) -> Result<Book, BookError> {
        validate_text(&draft.title, &draft.author)?;

        if self
            .books
            .iter()
            .any(|b| b.same_work(&draft.title, &draft.author))
        {
            debug!(title = draft.title.trim(), "rejected duplicate book");
            return Err(ValidationError::DuplicateBook.into());
        }

        let book = Book::with_id(self.next_id(), draft);
        info!(id = %book.id, title = %book.title, "added book");
        self.books.push(book.clone());

        self.persist()?;
        Ok(book)
    }

    /// Edit the title, author and notes of a book
    ///
    /// Presence and length rules apply, the duplicate rule does not: a book
    /// may be edited to match another one.
    pub fn edit(
        &mut self,
        id: &BookId,
        title: &str,
        author: &str,
        notes: &str,
    ) -> Result<Book, BookError> {
        let index = self.index_of(id)?;
        validate_text(title, author)?;

        let book = &mut self.books[index];
        book.title = title.trim().to_string();
        book.author = author.trim().to_string();
        book.notes = notes.trim().to_string();
        book.touch();
        let updated = book.clone();
        info!(id = %updated.id, "edited book");

        self.persist()?;
        Ok(updated)
    }

    /// Move a book to another reading status
    pub fn set_status(&mut self, id: &BookId, status: Status) -> Result<Book, BookError> {
        let index = self.index_of(id)?;

        let book = &mut self.books[index];
        book.status = status;
        book.touch();
        let updated = book.clone();
        info!(id = %updated.id, status = %status, "changed book status");

        self.persist()?;
        Ok(updated)
    }

    /// Change the category of a book
    pub fn set_category(&mut self, id: &BookId, category: Category) -> Result<Book, BookError> {
        let index = self.index_of(id)?;

        let book = &mut self.books[index];
        book.category = category;
        book.touch();
        let updated = book.clone();
        info!(id = %updated.id, category = %category, "changed book category");

        self.persist()?;
        Ok(updated)
    }

    /// Delete a book
    ///
    /// Returns the removed book, or `None` if no book had that id. Deleting
    /// an unknown id is not an error and writes nothing.
    pub fn delete(&mut self, id: &BookId) -> Result<Option<Book>, BookError> {
        let Some(index) = self.books.iter().position(|b| &b.id == id) else {
            debug!(id = %id, "delete of unknown book ignored");
            return Ok(None);
        };

        let removed = self.books.remove(index);
        info!(id = %removed.id, title = %removed.title, "deleted book");

        self.persist()?;
        Ok(Some(removed))
    }

    /// Write the full collection to the slot
    ///
    /// A failure leaves the in-memory collection untouched.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let payload = storage::encode(&self.books);
        self.slot.save(&payload).map_err(|e| {
            warn!(
                slot = self.slot.name(),
                recoverable = e.is_recoverable(),
                error = %e,
                "failed to save books"
            );
            e
        })
    }

    fn index_of(&self, id: &BookId) -> Result<usize, BookError> {
        self.books
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| BookError::NotFound(id.clone()))
    }

    fn next_id(&self) -> BookId {
        loop {
            let id = BookId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
