//! Navigation sync
//!
//! Keeps the active filter in step with a navigable history, so that
//! stepping back and forward restores earlier filters.
//!
//! The environment supplies a `NavigationState` (browser history, an
//! in-process stack, ...). It pushes entries when the user picks a filter
//! and reports back/forward traversal by calling
//! `NavigationSync::on_history_navigate` with the restored state.
//!
//! The filter is encoded in a location as a single query parameter:
//! `?filter=reading`. Unrecognized or absent values mean "keep what we have".

use tracing::debug;

use crate::query::Filter;

/// Query parameter carrying the filter
pub const FILTER_PARAM: &str = "filter";

/// A navigable history the filter is mirrored into
pub trait NavigationState {
    /// Record a new history entry for `filter`
    fn push(&mut self, filter: Filter);

    /// The filter value encoded in the location at startup, if any
    fn read_initial(&self) -> Option<String>;
}

/// Listener notified whenever the active filter changes
pub type FilterListener = Box<dyn FnMut(Filter)>;

/// The single piece of navigation state: the active filter
pub struct NavigationSync<N: NavigationState> {
    current: Filter,
    state: N,
    listeners: Vec<FilterListener>,
}

impl<N: NavigationState> NavigationSync<N> {
    pub fn new(state: N) -> Self {
        Self {
            current: Filter::All,
            state,
            listeners: Vec::new(),
        }
    }

    /// The active filter
    pub fn current(&self) -> Filter {
        self.current
    }

    /// The underlying navigation state
    pub fn state(&self) -> &N {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut N {
        &mut self.state
    }

    /// Register a listener for filter changes
    pub fn subscribe(&mut self, listener: FilterListener) {
        self.listeners.push(listener);
    }

    /// Select a filter and push a history entry for it
    pub fn set_filter(&mut self, filter: Filter) {
        debug!(filter = %filter, "filter selected");
        self.current = filter;
        self.state.push(filter);
        self.emit();
    }

    /// Apply a state restored by back/forward navigation
    ///
    /// Returns true if the state carried a recognized filter and it was
    /// applied. No history entry is pushed.
    pub fn on_history_navigate(&mut self, restored: Option<&str>) -> bool {
        match restored.and_then(Filter::parse) {
            Some(filter) => {
                debug!(filter = %filter, "filter restored from history");
                self.current = filter;
                self.emit();
                true
            }
            None => {
                debug!(state = ?restored, "ignoring unrecognized history state");
                false
            }
        }
    }

    /// Adopt the filter encoded in the initial location, if recognized
    pub fn init_from_location(&mut self) -> Filter {
        if let Some(filter) = self.state.read_initial().as_deref().and_then(Filter::parse) {
            self.current = filter;
        }
        self.current
    }

    fn emit(&mut self) {
        let filter = self.current;
        for listener in &mut self.listeners {
            listener(filter);
        }
    }
}

/// Extract the raw filter value from a query string
///
/// Accepts a leading `?`; the first `filter` parameter wins. The value is
/// returned undecoded, callers validate it.
pub fn filter_param(query: &str) -> Option<&str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == FILTER_PARAM)
        .map(|(_, value)| value)
}

/// Recognized filter encoded in a query string
pub fn filter_from_query(query: &str) -> Option<Filter> {
    filter_param(query).and_then(Filter::parse)
}

/// Query string selecting `filter`
pub fn query_for(filter: Filter) -> String {
    format!("?{}={}", FILTER_PARAM, filter.as_str())
}

/// In-process history with back and forward traversal
///
/// Entries hold the pushed filter literal. Pushing after going back drops
/// the forward entries, as browsers do.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    initial: Option<String>,
    entries: Vec<String>,
    position: usize,
}

impl MemoryHistory {
    /// Start from an initial location such as `?filter=reading`
    pub fn new(location: Option<&str>) -> Self {
        let initial = location.and_then(filter_param).map(str::to_string);
        Self {
            entries: vec![initial.clone().unwrap_or_default()],
            initial,
            position: 0,
        }
    }

    /// Step back, returning the restored state
    pub fn back(&mut self) -> Option<&str> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.entries[self.position].as_str())
    }

    /// Step forward, returning the restored state
    pub fn forward(&mut self) -> Option<&str> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.entries[self.position].as_str())
    }

    /// The current location as a query string
    pub fn location(&self) -> String {
        match self.entries[self.position].as_str() {
            "" => String::new(),
            value => format!("?{}={}", FILTER_PARAM, value),
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NavigationState for MemoryHistory {
    fn push(&mut self, filter: Filter) {
        self.entries.truncate(self.position + 1);
        self.entries.push(filter.as_str().to_string());
        self.position = self.entries.len() - 1;
    }

    fn read_initial(&self) -> Option<String> {
        self.initial.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_at_all() {
        let nav = NavigationSync::new(MemoryHistory::default());
        assert_eq!(nav.current(), Filter::All);
    }

    #[test]
    fn test_init_from_location() {
        let mut nav = NavigationSync::new(MemoryHistory::new(Some("?filter=reading")));
        assert_eq!(nav.init_from_location(), Filter::Reading);
        assert_eq!(nav.current(), Filter::Reading);
    }

    #[test]
    fn test_init_ignores_unknown_location() {
        for location in ["?filter=abandoned", "?filter=", "?sort=title", ""] {
            let mut nav = NavigationSync::new(MemoryHistory::new(Some(location)));
            assert_eq!(nav.init_from_location(), Filter::All, "location {:?}", location);
        }
    }

    #[test]
    fn test_set_filter_pushes_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut nav = NavigationSync::new(MemoryHistory::new(None));
        nav.subscribe(Box::new(move |f| sink.borrow_mut().push(f)));

        nav.set_filter(Filter::Finished);
        nav.set_filter(Filter::ToRead);

        assert_eq!(nav.current(), Filter::ToRead);
        assert_eq!(nav.state().entries.len(), 3);
        assert_eq!(nav.state().location(), "?filter=to-read");
        assert_eq!(*seen.borrow(), vec![Filter::Finished, Filter::ToRead]);
    }

    #[test]
    fn test_back_restores_previous_filter() {
        let mut nav = NavigationSync::new(MemoryHistory::new(None));
        nav.set_filter(Filter::Reading);
        nav.set_filter(Filter::Finished);

        let restored = nav.state_mut().back().map(str::to_string);
        assert!(nav.on_history_navigate(restored.as_deref()));
        assert_eq!(nav.current(), Filter::Reading);

        // History was not extended by the restore
        assert_eq!(nav.state().entries.len(), 3);

        let restored = nav.state_mut().forward().map(str::to_string);
        assert!(nav.on_history_navigate(restored.as_deref()));
        assert_eq!(nav.current(), Filter::Finished);
    }

    #[test]
    fn test_back_to_blank_entry_keeps_filter() {
        let mut nav = NavigationSync::new(MemoryHistory::new(None));
        nav.set_filter(Filter::Reading);

        let restored = nav.state_mut().back().map(str::to_string);
        assert_eq!(restored.as_deref(), Some(""));
        assert!(!nav.on_history_navigate(restored.as_deref()));
        assert_eq!(nav.current(), Filter::Reading);

        assert!(nav.state_mut().back().is_none());
    }

    #[test]
    fn test_unrecognized_state_ignored() {
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);

        let mut nav = NavigationSync::new(MemoryHistory::new(None));
        nav.subscribe(Box::new(move |_| *sink.borrow_mut() += 1));
        nav.set_filter(Filter::Reading);

        assert!(!nav.on_history_navigate(Some("bogus")));
        assert!(!nav.on_history_navigate(None));
        assert_eq!(nav.current(), Filter::Reading);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_push_after_back_drops_forward() {
        let mut history = MemoryHistory::new(None);
        history.push(Filter::Reading);
        history.push(Filter::Finished);
        history.back();
        history.push(Filter::ToRead);

        assert_eq!(history.entries.len(), 3);
        assert!(history.forward().is_none());
        assert_eq!(history.back(), Some("reading"));
    }

    #[test]
    fn test_query_codec() {
        assert_eq!(filter_param("?filter=reading&sort=title"), Some("reading"));
        assert_eq!(filter_param("sort=title&filter=finished"), Some("finished"));
        assert_eq!(filter_param("?filter"), Some(""));
        assert_eq!(filter_param("?sort=title"), None);

        assert_eq!(filter_from_query("?filter=to-read"), Some(Filter::ToRead));
        assert_eq!(filter_from_query("?filter=READING"), None);

        for filter in Filter::ALL {
            assert_eq!(filter_from_query(&query_for(filter)), Some(filter));
        }
    }
}
