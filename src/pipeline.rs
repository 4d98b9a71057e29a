// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;

use crate::collate::compare_titles;
use crate::podcast::{Podcast, PodcastId};
use crate::selector::{SortOption, ViewState};

/// The list to display for a given set of records and selectors
#[derive(Debug, Clone, PartialEq)]
pub struct Derived<'a> {
    /// Records to show, in display order
    pub visible: Vec<&'a Podcast>,
    /// Whether the filtered set extends beyond `visible`
    pub has_more: bool,
    /// Size of the filtered set before truncation
    pub total: usize,
    /// Filtered records whose timestamp could not be compared under a time sort
    pub malformed: Vec<&'a PodcastId>,
}

/// Derive the visible list from records and selectors
///
/// Stages run in a fixed order: search filter, genre filter, stable sort,
/// truncation to the display count. The function is pure and never fails.
/// Under a time-based sort, records with a malformed timestamp rank as the
/// earliest possible instant and are listed in [`Derived::malformed`].
pub fn derive<'a>(records: &'a [Podcast], state: &ViewState) -> Derived<'a> {
    let needle = state.search_term.to_lowercase();

    let mut filtered: Vec<&Podcast> = records
        .iter()
        .filter(|podcast| needle.is_empty() || podcast.title.to_lowercase().contains(&needle))
        .filter(|podcast| state.genre.matches(&podcast.genres))
        .collect();

    filtered.sort_by(|a, b| compare(a, b, state.sort));

    let malformed = if state.sort.is_time_based() {
        filtered
            .iter()
            .copied()
            .filter(|podcast| podcast.updated.is_malformed())
            .map(|podcast| &podcast.id)
            .collect()
    } else {
        Vec::new()
    };

    let total = filtered.len();
    let display_count = state.display_count.get();
    filtered.truncate(display_count);

    Derived {
        visible: filtered,
        has_more: display_count < total,
        total,
        malformed,
    }
}

fn compare(a: &Podcast, b: &Podcast, sort: SortOption) -> Ordering {
    match sort {
        SortOption::TitleAscending => compare_titles(&a.title, &b.title),
        SortOption::TitleDescending => compare_titles(&a.title, &b.title).reverse(),
        // `None` orders below every `Some`, i.e. malformed counts as earliest
        SortOption::MostRecent => b.updated.instant().cmp(&a.updated.instant()),
        SortOption::Oldest => a.updated.instant().cmp(&b.updated.instant()),
        SortOption::Unsorted => Ordering::Equal,
    }
}
