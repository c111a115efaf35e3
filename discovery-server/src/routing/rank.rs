//! Itinerary ranking for transit results.
//!
//! Ranks itineraries so the fastest option is presented first.

use serde::Serialize;

use crate::domain::Itinerary;

/// Rank itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Total duration (shorter is better)
/// 2. Number of transfers (fewer is better)
///
/// The sort is stable, so remaining ties keep provider order.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| {
        a.total_duration_seconds
            .cmp(&b.total_duration_seconds)
            .then(a.transfer_count.cmp(&b.transfer_count))
    });

    itineraries
}

/// Error returned when selecting an itinerary that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("itinerary {index} out of range (have {len})")]
pub struct SelectionOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Ranked itineraries plus the one the user is looking at.
///
/// The selection starts at the fastest itinerary and only changes when the
/// user picks another one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySelection {
    itineraries: Vec<Itinerary>,
    selected: usize,
}

impl ItinerarySelection {
    /// Rank the given itineraries and select the first.
    pub fn new(itineraries: Vec<Itinerary>) -> Self {
        Self {
            itineraries: rank_itineraries(itineraries),
            selected: 0,
        }
    }

    /// Wrap itineraries that are already ranked.
    pub fn from_ranked(itineraries: Vec<Itinerary>) -> Self {
        Self {
            itineraries,
            selected: 0,
        }
    }

    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected itinerary, or `None` when there are no itineraries.
    pub fn selected(&self) -> Option<&Itinerary> {
        self.itineraries.get(self.selected)
    }

    /// Change the selection.
    pub fn select(&mut self, index: usize) -> Result<&Itinerary, SelectionOutOfRange> {
        let len = self.itineraries.len();
        if index >= len {
            return Err(SelectionOutOfRange { index, len });
        }
        self.selected = index;
        Ok(&self.itineraries[index])
    }
}
