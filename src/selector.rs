// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::genre::GenreId;

/// Number of results shown before any "load more"
pub const DEFAULT_DISPLAY_COUNT: usize = 20;

/// How the visible list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    TitleAscending,
    TitleDescending,
    MostRecent,
    Oldest,
    /// Catalogue order; what any unrecognised key selects
    Unsorted,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::TitleAscending,
        SortOption::TitleDescending,
        SortOption::MostRecent,
        SortOption::Oldest,
    ];

    /// Map a selector key to a sort option, falling back to `Unsorted`
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "a-z" => SortOption::TitleAscending,
            "z-a" => SortOption::TitleDescending,
            "most-recent" => SortOption::MostRecent,
            "oldest" => SortOption::Oldest,
            other => {
                debug!(key = other, "unrecognised sort key, keeping catalogue order");
                SortOption::Unsorted
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortOption::TitleAscending => "a-z",
            SortOption::TitleDescending => "z-a",
            SortOption::MostRecent => "most-recent",
            SortOption::Oldest => "oldest",
            SortOption::Unsorted => "none",
        }
    }

    pub fn is_time_based(&self) -> bool {
        matches!(self, SortOption::MostRecent | SortOption::Oldest)
    }
}

impl FromStr for SortOption {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_key(s))
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which genre the list is restricted to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(GenreId),
    /// A selector value that is not a genre id; matches nothing
    Unparseable(String),
}

impl GenreFilter {
    /// Map a selector key ("all" or an integer id) to a filter
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        if key.eq_ignore_ascii_case("all") {
            return GenreFilter::All;
        }
        match key.parse() {
            Ok(id) => GenreFilter::Genre(GenreId(id)),
            Err(_) => GenreFilter::Unparseable(key.to_string()),
        }
    }

    /// Whether a podcast with these genres passes the filter
    pub fn matches(&self, genres: &[GenreId]) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Genre(id) => genres.contains(id),
            GenreFilter::Unparseable(_) => false,
        }
    }
}

impl FromStr for GenreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_key(s))
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => f.write_str("all"),
            GenreFilter::Genre(id) => write!(f, "{id}"),
            GenreFilter::Unparseable(raw) => f.write_str(raw),
        }
    }
}

/// How many results are revealed; always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplayCount(NonZeroUsize);

impl DisplayCount {
    /// Returns `None` for zero
    pub fn new(count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(Self)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Reveal `step` more results; saturates instead of overflowing
    pub fn increase(self, step: usize) -> Self {
        Self(self.0.saturating_add(step))
    }
}

impl Default for DisplayCount {
    fn default() -> Self {
        let count = NonZeroUsize::new(DEFAULT_DISPLAY_COUNT);
        Self(count.unwrap_or(NonZeroUsize::MIN))
    }
}

/// What happens to the display count when a selector changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingPolicy {
    /// Start again from the initial page
    #[default]
    Reset,
    /// Keep however many results were already revealed
    Keep,
}

/// The user-controlled inputs of the derived list
///
/// Transitions consume the state and return the next one; nothing mutates a
/// state in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort: SortOption,
    pub genre: GenreFilter,
    pub display_count: DisplayCount,
    initial_count: DisplayCount,
    policy: PagingPolicy,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DisplayCount::default(), PagingPolicy::default())
    }
}

impl ViewState {
    /// Create a state with default selectors, revealing `initial_count` results
    pub fn new(initial_count: DisplayCount, policy: PagingPolicy) -> Self {
        Self {
            search_term: String::new(),
            sort: SortOption::default(),
            genre: GenreFilter::default(),
            display_count: initial_count,
            initial_count,
            policy,
        }
    }

    pub fn policy(&self) -> PagingPolicy {
        self.policy
    }

    pub fn initial_count(&self) -> DisplayCount {
        self.initial_count
    }

    pub fn with_search_term(self, term: impl Into<String>) -> Self {
        let term = term.into();
        if term == self.search_term {
            return self;
        }
        Self {
            search_term: term,
            ..self
        }
        .selector_changed()
    }

    pub fn with_sort(self, sort: SortOption) -> Self {
        if sort == self.sort {
            return self;
        }
        Self { sort, ..self }.selector_changed()
    }

    pub fn with_genre(self, genre: GenreFilter) -> Self {
        if genre == self.genre {
            return self;
        }
        Self { genre, ..self }.selector_changed()
    }

    /// Set the display count directly
    pub fn with_display_count(self, display_count: DisplayCount) -> Self {
        Self {
            display_count,
            ..self
        }
    }

    /// Reveal `step` more results
    pub fn load_more(self, step: usize) -> Self {
        let display_count = self.display_count.increase(step);
        Self {
            display_count,
            ..self
        }
    }

    pub fn reset_display_count(self) -> Self {
        Self {
            display_count: self.initial_count,
            ..self
        }
    }

    /// Apply an interactive command, returning the next state
    ///
    /// Commands that don't touch the selectors leave the state unchanged.
    pub fn apply(self, command: &Command, step: usize) -> Self {
        match command {
            Command::Search(term) => self.with_search_term(term.clone()),
            Command::Sort(sort) => self.with_sort(*sort),
            Command::Genre(genre) => self.with_genre(genre.clone()),
            Command::More => self.load_more(step),
            Command::Show(count) => self.with_display_count(*count),
            Command::Reset => Self::new(self.initial_count, self.policy),
            Command::Genres | Command::Help | Command::Quit => self,
        }
    }

    fn selector_changed(self) -> Self {
        match self.policy {
            PagingPolicy::Reset => self.reset_display_count(),
            PagingPolicy::Keep => self,
        }
    }
}
