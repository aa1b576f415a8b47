//! Storage layer
//!
//! The whole collection lives in a single named slot, serialized as a JSON
//! array of book records. A slot is anything that can hand back the last
//! saved payload and accept a new one.
//!
//! ## Backends
//!
//! - **SQLite**: key-value table, one row per slot (default)
//! - **File**: one JSON file per slot, written atomically
//! - **Memory**: in-process, for tests and embedding
//!
//! Loading is fail-soft: a missing, unreadable or malformed slot yields an
//! empty collection.

pub mod error;
pub mod file;
pub mod memory;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use file::FileSlot;
pub use memory::MemorySlot;
pub use sqlite::SqliteSlot;

use tracing::{debug, warn};

use crate::models::Book;

/// Default slot name
pub const DEFAULT_SLOT: &str = "readStackBooks";

/// A named persistent location holding the serialized collection
pub trait Slot {
    /// The slot name
    fn name(&self) -> &str;

    /// Read the last saved payload, `None` if nothing was ever saved
    fn load(&self) -> StorageResult<Option<String>>;

    /// Replace the stored payload
    fn save(&mut self, payload: &str) -> StorageResult<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        (**self).save(payload)
    }
}

/// Serialize a collection to its stored form
pub fn encode(books: &[Book]) -> String {
    // Serializing plain structs with string keys cannot fail
    serde_json::to_string(books).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored payload back into a collection
pub fn decode(payload: &str) -> Result<Vec<Book>, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Load the collection from a slot, degrading to empty on any failure
pub fn load_collection<S: Slot + ?Sized>(slot: &S) -> Vec<Book> {
    let payload = match slot.load() {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!(slot = slot.name(), "slot is empty, starting with no books");
            return Vec::new();
        }
        Err(e) => {
            warn!(slot = slot.name(), error = %e, "could not read slot, starting empty");
            return Vec::new();
        }
    };

    match decode(&payload) {
        Ok(books) => {
            debug!(slot = slot.name(), count = books.len(), "loaded books");
            books
        }
        Err(e) => {
            warn!(slot = slot.name(), error = %e, "stored books are malformed, starting empty");
            Vec::new()
        }
    }
}
