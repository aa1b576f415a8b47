//! Session controller
//!
//! Wires the record store, the filter engine and navigation sync to a
//! presentation layer. Every operation runs to completion: mutate, persist,
//! recompute the view, then tell the presenter what happened.

use tracing::debug;

use crate::error::{BookError, ValidationError};
use crate::models::{Book, BookDraft, BookId, Status};
use crate::navigation::{NavigationState, NavigationSync};
use crate::query::{filter_counts, filtered_view, statistics, Filter, FilterCounts, Statistics};
use crate::storage::Slot;
use crate::store::Store;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Everything a presenter needs to draw the library
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub filter: Filter,
    pub books: Vec<&'a Book>,
    pub statistics: Statistics,
    pub counts: FilterCounts,
}

impl<'a> View<'a> {
    /// Compute the view of `books` under `filter`
    pub fn compute(books: &'a [Book], filter: Filter) -> Self {
        Self {
            filter,
            books: filtered_view(books, filter),
            statistics: statistics(books),
            counts: filter_counts(books),
        }
    }
}

/// Consumer of view changes and user-facing notifications
pub trait Presenter {
    /// Redraw after a state or filter change
    fn render(&mut self, view: &View<'_>);

    /// Show the outcome of an operation
    fn notify(&mut self, message: &str, severity: Severity);
}

pub const WELCOME_MESSAGE: &str = "Welcome to Read Stack! Start building your digital library.";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving data! Please try again.";
pub const EDIT_MISSING_FIELD_MESSAGE: &str = "Title and author cannot be empty!";

/// A running library session
pub struct Session<S: Slot, N: NavigationState, P: Presenter> {
    store: Store<S>,
    nav: NavigationSync<N>,
    presenter: P,
}

impl<S: Slot, N: NavigationState, P: Presenter> Session<S, N, P> {
    pub fn new(store: Store<S>, nav: NavigationSync<N>, presenter: P) -> Self {
        Self {
            store,
            nav,
            presenter,
        }
    }

    /// Adopt the filter from the location, draw, and greet new users
    pub fn start(&mut self) {
        let filter = self.nav.init_from_location();
        debug!(filter = %filter, books = self.store.len(), "session started");
        self.refresh();

        if self.store.is_empty() {
            self.presenter.notify(WELCOME_MESSAGE, Severity::Info);
        }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationSync<N> {
        &self.nav
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationSync<N> {
        &mut self.nav
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The view under the active filter
    pub fn view(&self) -> View<'_> {
        View::compute(self.store.books(), self.nav.current())
    }

    /// Add a book
    pub fn add(&mut self, draft: &BookDraft) -> Result<Book, BookError> {
        let result = self.store.add(draft);
        self.report(&result, "Book added successfully!");
        result
    }

    /// Edit title, author and notes of a book
    pub fn edit(
        &mut self,
        id: &BookId,
        title: &str,
        author: &str,
        notes: &str,
    ) -> Result<Book, BookError> {
        let result = self.store.edit(id, title, author, notes);
        match &result {
            Err(BookError::Validation(ValidationError::MissingField)) => {
                self.presenter
                    .notify(EDIT_MISSING_FIELD_MESSAGE, Severity::Error);
            }
            _ => self.report(&result, "Book updated successfully!"),
        }
        result
    }

    /// Change the reading status of a book
    pub fn set_status(&mut self, id: &BookId, status: Status) -> Result<Book, BookError> {
        let result = self.store.set_status(id, status);
        let message = format!("Marked as {}!", status.display_name());
        self.report(&result, &message);
        result
    }

    /// Delete a book; unknown ids are ignored silently
    pub fn delete(&mut self, id: &BookId) -> Result<Option<Book>, BookError> {
        let result = self.store.delete(id);
        match &result {
            Ok(Some(_)) => {
                self.refresh();
                self.presenter
                    .notify("Book deleted successfully!", Severity::Success);
            }
            Ok(None) => {}
            Err(e) => self.report_error(e),
        }
        result
    }

    /// Select a filter, recording it in history
    pub fn set_filter(&mut self, filter: Filter) {
        self.nav.set_filter(filter);
        self.refresh();
    }

    /// Apply a state restored by back/forward navigation
    pub fn on_history_navigate(&mut self, restored: Option<&str>) -> bool {
        let applied = self.nav.on_history_navigate(restored);
        if applied {
            self.refresh();
        }
        applied
    }

    fn report(&mut self, result: &Result<Book, BookError>, success: &str) {
        match result {
            Ok(_) => {
                self.refresh();
                self.presenter.notify(success, Severity::Success);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, error: &BookError) {
        match error {
            BookError::Validation(ValidationError::DuplicateBook) => {
                self.presenter.notify(&error.to_string(), Severity::Warning);
            }
            BookError::Validation(_) | BookError::NotFound(_) => {
                self.presenter.notify(&error.to_string(), Severity::Error);
            }
            BookError::Persistence(_) => {
                // The change is applied in memory, so the view still moves
                self.refresh();
                let message = match error.recovery_suggestion() {
                    Some(hint) => format!("{} {}", SAVE_FAILED_MESSAGE, hint),
                    None => SAVE_FAILED_MESSAGE.to_string(),
                };
                self.presenter.notify(&message, Severity::Error);
            }
        }
    }

    /// Redraw the current view
    pub fn refresh(&mut self) {
        let view = View::compute(self.store.books(), self.nav.current());
        self.presenter.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MemoryHistory;
    use crate::storage::{MemorySlot, DEFAULT_SLOT};

    /// Records what it was asked to show
    #[derive(Default)]
    struct Recorder {
        renders: Vec<(Filter, Vec<String>, FilterCounts)>,
        notes: Vec<(String, Severity)>,
    }

    impl Presenter for Recorder {
        fn render(&mut self, view: &View<'_>) {
            self.renders.push((
                view.filter,
                view.books.iter().map(|b| b.title.clone()).collect(),
                view.counts,
            ));
        }

        fn notify(&mut self, message: &str, severity: Severity) {
            self.notes.push((message.to_string(), severity));
        }
    }

    type TestSession = Session<MemorySlot, MemoryHistory, Recorder>;

    fn session(location: Option<&str>) -> TestSession {
        let store = Store::open(MemorySlot::new(DEFAULT_SLOT));
        let nav = NavigationSync::new(MemoryHistory::new(location));
        Session::new(store, nav, Recorder::default())
    }

    fn last_note(session: &TestSession) -> (String, Severity) {
        session.presenter().notes.last().cloned().unwrap()
    }

    #[test]
    fn test_start_empty_welcomes() {
        let mut s = session(Some("?filter=finished"));
        s.start();

        assert_eq!(s.navigation().current(), Filter::Finished);
        assert_eq!(s.presenter().renders.len(), 1);
        assert_eq!(last_note(&s), (WELCOME_MESSAGE.to_string(), Severity::Info));
    }

    #[test]
    fn test_add_renders_and_notifies() {
        let mut s = session(None);
        s.start();

        s.add(&BookDraft::new("Dune", "Frank Herbert")).unwrap();

        let (filter, titles, counts) = s.presenter().renders.last().cloned().unwrap();
        assert_eq!(filter, Filter::All);
        assert_eq!(titles, vec!["Dune"]);
        assert_eq!(counts.all, 1);
        assert_eq!(counts.to_read, 1);
        assert_eq!(last_note(&s).1, Severity::Success);
    }

    #[test]
    fn test_rejections_do_not_render() {
        let mut s = session(None);
        s.add(&BookDraft::new("Foo", "Bar")).unwrap();
        let renders = s.presenter().renders.len();

        assert!(s.add(&BookDraft::new("foo", "BAR")).is_err());
        assert_eq!(last_note(&s).1, Severity::Warning);

        assert!(s.add(&BookDraft::new("F", "Bar")).is_err());
        assert_eq!(last_note(&s).1, Severity::Error);

        assert!(s.edit(&BookId::from("nope"), "Title", "Author", "").is_err());
        assert_eq!(last_note(&s).1, Severity::Error);

        assert_eq!(s.presenter().renders.len(), renders);
        assert_eq!(s.store().len(), 1);
    }

    #[test]
    fn test_filter_and_history() {
        let mut s = session(None);
        s.start();
        let reading = s
            .add(&BookDraft::new("Cosmos", "Carl Sagan").status(Status::Reading))
            .unwrap();
        s.add(&BookDraft::new("Dune", "Frank Herbert")).unwrap();

        s.set_filter(Filter::Reading);
        let (_, titles, _) = s.presenter().renders.last().cloned().unwrap();
        assert_eq!(titles, vec!["Cosmos"]);

        s.set_filter(Filter::ToRead);
        let restored = s.navigation_mut().state_mut().back().map(str::to_string);
        assert!(s.on_history_navigate(restored.as_deref()));
        assert_eq!(s.navigation().current(), Filter::Reading);

        s.set_status(&reading.id, Status::Finished).unwrap();
        let (filter, titles, counts) = s.presenter().renders.last().cloned().unwrap();
        assert_eq!(filter, Filter::Reading);
        assert!(titles.is_empty());
        assert_eq!(counts.finished, 1);
        assert_eq!(s.view().statistics.completion_percent, 50);
    }

    #[test]
    fn test_delete_unknown_is_silent() {
        let mut s = session(None);
        let notes = s.presenter().notes.len();
        assert!(s.delete(&BookId::from("nope")).unwrap().is_none());
        assert_eq!(s.presenter().notes.len(), notes);
        assert!(s.presenter().renders.is_empty());
    }

    #[test]
    fn test_persistence_failure_reported() {
        let store = Store::open(MemorySlot::new(DEFAULT_SLOT));
        let nav = NavigationSync::new(MemoryHistory::default());
        let mut s = Session::new(store, nav, Recorder::default());

        s.store.slot_mut().set_fail_writes(true);
        let err = s.add(&BookDraft::new("Dune", "Frank Herbert")).unwrap_err();
        assert!(matches!(err, BookError::Persistence(_)));

        let (message, severity) = last_note(&s);
        assert_eq!(severity, Severity::Error);
        assert_eq!(
            message,
            "Error saving data! Please try again. The storage area is full or read-only."
        );
        let (_, titles, _) = s.presenter().renders.last().cloned().unwrap();
        assert_eq!(titles, vec!["Dune"]);
    }

    #[test]
    fn test_delete_unknown_with_failing_slot_is_silent() {
        let mut s = session(None);
        s.store.slot_mut().set_fail_writes(true);

        assert!(s.delete(&BookId::from("nope")).unwrap().is_none());
        assert!(s.presenter().notes.is_empty());
    }

    #[test]
    fn test_edit_blank_field_message() {
        let mut s = session(None);
        let book = s.add(&BookDraft::new("Dune", "Frank Herbert")).unwrap();

        assert!(s.edit(&book.id, "  ", "Frank Herbert", "").is_err());
        assert_eq!(
            last_note(&s),
            (EDIT_MISSING_FIELD_MESSAGE.to_string(), Severity::Error)
        );

        // Adding keeps its own wording
        assert!(s.add(&BookDraft::new("", "Frank Herbert")).is_err());
        assert_eq!(
            last_note(&s).0,
            "Please fill in both title and author fields!"
        );

        assert!(s.edit(&book.id, "D", "Frank Herbert", "").is_err());
        assert_eq!(
            last_note(&s).0,
            "Title and author must be at least 2 characters long!"
        );
        assert_eq!(s.store().get(&book.id).unwrap().title, "Dune");
    }
}
