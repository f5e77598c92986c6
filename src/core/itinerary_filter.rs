//! Derives the displayed itinerary list from a source snapshot.
//!
//! The list is recomputed from scratch on every input change (search term,
//! sort mode or source collection); nothing carries over between derivations.

use crate::domain::model::{Itinerary, SearchState, SortMode};

/// Filters `items` by `search_term` and orders them by date.
///
/// An item is kept when the term is empty, or when the lower-cased term is a
/// substring of the lower-cased title or tags. The term is used literally,
/// whitespace included. Sorting is stable, so items on the same date keep
/// their input order.
pub fn derive(items: &[Itinerary], search_term: &str, sort_mode: SortMode) -> Vec<Itinerary> {
    let mut derived: Vec<Itinerary> = if search_term.is_empty() {
        items.to_vec()
    } else {
        let needle = search_term.to_lowercase();
        items
            .iter()
            .filter(|itinerary| matches(itinerary, &needle))
            .cloned()
            .collect()
    };

    match sort_mode {
        SortMode::Newest => derived.sort_by(|a, b| b.date.cmp(&a.date)),
        SortMode::Oldest => derived.sort_by(|a, b| a.date.cmp(&b.date)),
    }

    tracing::debug!(
        "Derived {} of {} itineraries (term: {:?}, sort: {})",
        derived.len(),
        items.len(),
        search_term,
        sort_mode
    );

    derived
}

fn matches(itinerary: &Itinerary, needle: &str) -> bool {
    itinerary.title.to_lowercase().contains(needle)
        || itinerary.tags.to_lowercase().contains(needle)
}

impl SearchState {
    /// Runs the engine over `items` with this search/sort state.
    pub fn apply(&self, items: &[Itinerary]) -> Vec<Itinerary> {
        derive(items, &self.search_term, self.sort_mode)
    }
}
