// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Title collation.
//!
//! Titles are ordered the way a default locale collation orders them rather
//! than by code point. Comparison happens in three levels: base letters
//! (accents and case ignored), then accents (unaccented first), then case
//! (lowercase first).

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two titles for display ordering
///
/// Returns `Ordering::Equal` only for identical (trimmed) titles.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());

    primary(a, b)
        .then_with(|| secondary(a, b))
        .then_with(|| tertiary(a, b))
        .then_with(|| a.cmp(b))
}

/// Base characters: decomposed, combining marks removed
fn base(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c))
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    base(s).flat_map(char::to_lowercase)
}

fn primary(a: &str, b: &str) -> Ordering {
    folded(a).cmp(folded(b))
}

/// Accents decide: a bare letter sorts before the same letter with a mark
fn secondary(a: &str, b: &str) -> Ordering {
    let marks = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let (a, b) = (marks(a), marks(b));

    a.iter()
        .zip(b.iter())
        .find(|(x, y)| x != y)
        .map(|(x, y)| match (is_combining_mark(*x), is_combining_mark(*y)) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => x.cmp(y),
        })
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// First case difference decides: lowercase before uppercase
fn tertiary(a: &str, b: &str) -> Ordering {
    base(a)
        .zip(base(b))
        .find_map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) if y.is_uppercase() => Some(Ordering::Less),
            (false, true) if x.is_uppercase() => Some(Ordering::Greater),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}
