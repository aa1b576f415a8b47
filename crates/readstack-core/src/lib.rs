//! Read Stack Core Library
//!
//! This crate provides the core functionality for Read Stack, a personal
//! reading tracker: a single user records books with title, author,
//! category, reading status and notes, persisted locally.
//!
//! # Architecture
//!
//! - **Store**: owns the collection and persists it to a named slot
//! - **Query**: pure filtering and statistics over the collection
//! - **Navigation**: mirrors the active filter into a navigable history
//! - **Session**: runs operations and reports them to a presentation layer
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = Store::open(config.open_slot()?);
//!
//! let book = store.add(&BookDraft::new("Dune", "Frank Herbert"))?;
//! let reading = filtered_view(store.books(), Filter::Reading);
//! let stats = statistics(store.books());
//! ```
//!
//! # Modules
//!
//! - `store`: Record store (main entry point)
//! - `models`: Book records, categories and statuses
//! - `query`: Filters, statistics and per-filter counts
//! - `navigation`: Filter/history synchronization
//! - `session`: Controller tying the above to a presenter
//! - `storage`: Slot backends (SQLite, file, memory)
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod query;
pub mod session;
pub mod storage;
pub mod store;

pub use config::{Backend, Config};
pub use error::{BookError, ValidationError};
pub use models::{Book, BookDraft, BookId, Category, Status};
pub use navigation::{MemoryHistory, NavigationState, NavigationSync};
pub use query::{filter_counts, filtered_view, statistics, Filter, FilterCounts, Statistics};
pub use session::{Presenter, Session, Severity, View};
pub use storage::{FileSlot, MemorySlot, Slot, SqliteSlot, StorageError};
pub use store::{PrefixMatch, Store};
