//! Stats command handler

use anyhow::Result;

use readstack_core::{filter_counts, statistics};

use super::LibraryStore;
use crate::output::Output;

/// Show library statistics
pub fn show(store: &LibraryStore, output: &Output) -> Result<()> {
    let stats = statistics(store.books());
    let counts = filter_counts(store.books());
    output.print_stats(&stats, &counts);
    Ok(())
}
