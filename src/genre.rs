// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a genre as delivered by the catalogue API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(pub u32);

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A genre catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub name: &'static str,
}

impl Genre {
    const fn new(id: u32, name: &'static str) -> Self {
        Self {
            id: GenreId(id),
            name,
        }
    }
}

/// The static genre catalogue, ordered by id
pub const GENRES: &[Genre] = &[
    Genre::new(1, "Personal Growth"),
    Genre::new(2, "Investigative Journalism"),
    Genre::new(3, "History"),
    Genre::new(4, "Comedy"),
    Genre::new(5, "Entertainment"),
    Genre::new(6, "Business"),
    Genre::new(7, "Fiction"),
    Genre::new(8, "News"),
    Genre::new(9, "Kids and Family"),
];

/// Look up the display name of a genre
pub fn genre_name(id: GenreId) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|genre| genre.id == id)
        .map(|genre| genre.name)
}

/// Display names for a list of genre ids, skipping ids the catalogue doesn't know
pub fn genre_names(ids: &[GenreId]) -> Vec<&'static str> {
    ids.iter().filter_map(|id| genre_name(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ids_are_unique_and_sorted() {
        let ids: Vec<_> = GENRES.iter().map(|g| g.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn known_genre_resolves_to_name() {
        assert_eq!(genre_name(GenreId(3)), Some("History"));
        assert_eq!(genre_name(GenreId(9)), Some("Kids and Family"));
    }

    #[test]
    fn unknown_genre_has_no_name() {
        assert_eq!(genre_name(GenreId(0)), None);
        assert_eq!(genre_name(GenreId(42)), None);
    }

    #[test]
    fn genre_names_skips_unknown_ids() {
        let names = genre_names(&[GenreId(4), GenreId(99), GenreId(8)]);
        assert_eq!(names, vec!["Comedy", "News"]);
    }
}
