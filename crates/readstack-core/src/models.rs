//! Data models for Read Stack
//!
//! Defines the book record and the closed vocabularies it draws from:
//! categories and reading statuses.
//!
//! Records are serialized with the field names used by the persisted
//! collection (`id`, `title`, `author`, `category`, `status`, `notes`,
//! `dateAdded`, `dateModified`), so a collection written by any front end
//! reads back unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque book identifier
///
/// Generated ids are UUIDv7 strings (millisecond timestamp plus random
/// bits). Ids read from storage are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display (first 8 characters)
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Book category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    Biography,
    History,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Business,
    Technology,
    Romance,
    Mystery,
    Fantasy,
    Educational,
    /// Catch-all, also used for unknown categories in stored data
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Every category, in menu order
    pub const ALL: [Category; 13] = [
        Category::Fiction,
        Category::NonFiction,
        Category::Science,
        Category::Biography,
        Category::History,
        Category::SelfHelp,
        Category::Business,
        Category::Technology,
        Category::Romance,
        Category::Mystery,
        Category::Fantasy,
        Category::Educational,
        Category::Other,
    ];

    /// The display (and wire) spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::NonFiction => "Non-Fiction",
            Category::Science => "Science",
            Category::Biography => "Biography",
            Category::History => "History",
            Category::SelfHelp => "Self-Help",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Romance => "Romance",
            Category::Mystery => "Mystery",
            Category::Fantasy => "Fantasy",
            Category::Educational => "Educational",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category or status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    /// Case-insensitive; accepts "nonfiction" and "self help" style spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        Category::ALL
            .into_iter()
            .find(|c| {
                let name: String = c
                    .as_str()
                    .chars()
                    .filter(|ch| ch.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .collect();
                name == wanted
            })
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

/// Reading status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    ToRead,
    Reading,
    Finished,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::ToRead, Status::Reading, Status::Finished];

    /// The wire value (`to-read`, `reading`, `finished`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ToRead => "to-read",
            Status::Reading => "reading",
            Status::Finished => "finished",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Status::ToRead => "To Read",
            Status::Reading => "Currently Reading",
            Status::Finished => "Finished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("status", s))
    }
}

/// A candidate book, as submitted to `Store::add`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: Category,
    pub status: Status,
    pub notes: String,
}

impl BookDraft {
    /// Create a draft with default category and status
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A tracked book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, immutable after creation
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: Category,
    pub status: Status,
    /// Free-form notes, may be empty
    #[serde(default)]
    pub notes: String,
    /// When this book was added
    pub date_added: DateTime<Utc>,
    /// When this book was last modified
    pub date_modified: DateTime<Utc>,
}

impl Book {
    /// Create a record from a draft under `id`, stamping both timestamps
    ///
    /// The draft is expected to be validated already; text fields are
    /// stored trimmed.
    pub fn with_id(id: BookId, draft: &BookDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title.trim().to_string(),
            author: draft.author.trim().to_string(),
            category: draft.category,
            status: draft.status,
            notes: draft.notes.trim().to_string(),
            date_added: now,
            date_modified: now,
        }
    }

    /// Whether this book has the same title and author, ignoring case
    pub fn same_work(&self, title: &str, author: &str) -> bool {
        self.title.trim().to_lowercase() == title.trim().to_lowercase()
            && self.author.trim().to_lowercase() == author.trim().to_lowercase()
    }

    /// Refresh the modification timestamp
    ///
    /// Never moves it before `date_added`, even if the clock went backwards.
    pub fn touch(&mut self) {
        self.date_modified = Utc::now().max(self.date_added);
    }
}
