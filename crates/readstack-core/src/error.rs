//! Errors surfaced by store operations
//!
//! None of these are fatal: a rejected operation leaves the collection as it
//! was, and a persistence failure leaves the in-memory collection
//! authoritative until the next successful save.

use thiserror::Error;

use crate::models::BookId;
use crate::storage::StorageError;

/// Why a candidate book was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Title or author is blank after trimming
    #[error("Please fill in both title and author fields!")]
    MissingField,

    /// Title or author is shorter than the minimum length
    #[error("Title and author must be at least 2 characters long!")]
    TooShort,

    /// A book with the same title and author is already tracked
    #[error("This book already exists in your library!")]
    DuplicateBook,
}

/// Minimum length of a trimmed title or author
pub const MIN_TEXT_LEN: usize = 2;

/// Errors returned by `Store` operations
#[derive(Error, Debug)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// The in-memory change was applied but could not be saved
    #[error("Error saving data: {0}")]
    Persistence(#[from] StorageError),
}

impl BookError {
    /// The validation failure, if this is one
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            BookError::Validation(v) => Some(*v),
            _ => None,
        }
    }

    /// What the user can do about a failed save, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            BookError::Persistence(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Check title and author against the presence and length rules
///
/// Both values are trimmed first. Length counts characters, not bytes.
pub fn validate_text(title: &str, author: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    let author = author.trim();

    if title.is_empty() || author.is_empty() {
        return Err(ValidationError::MissingField);
    }

    if title.chars().count() < MIN_TEXT_LEN || author.chars().count() < MIN_TEXT_LEN {
        return Err(ValidationError::TooShort);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing() {
        assert_eq!(validate_text("", "Author"), Err(ValidationError::MissingField));
        assert_eq!(validate_text("Title", "   "), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_validate_too_short() {
        assert_eq!(validate_text("X", "Author"), Err(ValidationError::TooShort));
        assert_eq!(validate_text("Title", " Y "), Err(ValidationError::TooShort));
    }

    #[test]
    fn test_validate_counts_characters() {
        // Two characters, more than two bytes
        assert_eq!(validate_text("Éa", "日本"), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert!(ValidationError::TooShort.to_string().contains("at least 2"));
        let err: BookError = ValidationError::DuplicateBook.into();
        assert_eq!(err.validation(), Some(ValidationError::DuplicateBook));
        assert_eq!(err.to_string(), "This book already exists in your library!");
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_persistence_suggestion() {
        let err: BookError = StorageError::Rejected {
            slot: "readStackBooks".to_string(),
        }
        .into();
        assert_eq!(
            err.recovery_suggestion(),
            Some("The storage area is full or read-only.")
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "No space left on device");
        let err: BookError =
            StorageError::from_io(io_err, std::path::PathBuf::from("/data/books.json")).into();
        assert_eq!(err.recovery_suggestion(), Some("Free up disk space and try again."));
    }
}
