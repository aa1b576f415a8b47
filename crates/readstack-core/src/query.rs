//! Filtering and derived statistics
//!
//! Pure functions over a slice of books. Nothing here is cached or stored;
//! call them as often as the view needs refreshing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Book, ParseEnumError, Status};

/// Status-based view selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    #[default]
    All,
    ToRead,
    Reading,
    Finished,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::ToRead, Filter::Reading, Filter::Finished];

    /// The literal used in locations and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::ToRead => "to-read",
            Filter::Reading => "reading",
            Filter::Finished => "finished",
        }
    }

    /// Parse one of the four recognized literals, exactly
    pub fn parse(value: &str) -> Option<Filter> {
        Filter::ALL.into_iter().find(|f| f.as_str() == value)
    }

    /// The status this filter selects, `None` for `All`
    pub fn status(&self) -> Option<Status> {
        match self {
            Filter::All => None,
            Filter::ToRead => Some(Status::ToRead),
            Filter::Reading => Some(Status::Reading),
            Filter::Finished => Some(Status::Finished),
        }
    }

    /// Whether a book is part of this view
    pub fn matches(&self, book: &Book) -> bool {
        self.status().map_or(true, |status| book.status == status)
    }
}

impl From<Status> for Filter {
    fn from(status: Status) -> Self {
        match status {
            Status::ToRead => Filter::ToRead,
            Status::Reading => Filter::Reading,
            Status::Finished => Filter::Finished,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| ParseEnumError::new("filter", s))
    }
}

/// Books matching `filter`, in collection order
pub fn filtered_view(books: &[Book], filter: Filter) -> Vec<&Book> {
    books.iter().filter(|b| filter.matches(b)).collect()
}

/// Headline numbers for the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub finished: usize,
    pub reading: usize,
    pub to_read: usize,
    /// Share of finished books, rounded half-up to a whole percent
    pub completion_percent: u32,
}

/// Compute statistics for a collection
pub fn statistics(books: &[Book]) -> Statistics {
    let counts = filter_counts(books);
    let total = counts.all;
    let finished = counts.finished;

    Statistics {
        total,
        finished,
        reading: counts.reading,
        to_read: counts.to_read,
        completion_percent: completion_percent(finished, total),
    }
}

/// round(finished / total * 100), half-up, 0 for an empty library
fn completion_percent(finished: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * finished as u64 + total as u64) / (2 * total as u64);
    scaled as u32
}

/// Number of books in each filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    #[serde(rename = "to-read")]
    pub to_read: usize,
    pub reading: usize,
    pub finished: usize,
}

impl FilterCounts {
    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::ToRead => self.to_read,
            Filter::Reading => self.reading,
            Filter::Finished => self.finished,
        }
    }
}

/// Count books per filter
pub fn filter_counts(books: &[Book]) -> FilterCounts {
    books.iter().fold(
        FilterCounts {
            all: books.len(),
            ..FilterCounts::default()
        },
        |mut counts, book| {
            match book.status {
                Status::ToRead => counts.to_read += 1,
                Status::Reading => counts.reading += 1,
                Status::Finished => counts.finished += 1,
            }
            counts
        },
    )
}
