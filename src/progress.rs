// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

/// Events emitted while the podcast catalogue is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Catalogue is being fetched from a URL
    FetchingCatalog { url: String },

    /// Catalogue bytes are being parsed (URL or file path)
    ParsingCatalog { source: String },

    /// Catalogue was loaded
    CatalogLoaded {
        /// Number of valid podcasts
        count: usize,
        /// Number of entries rejected during validation
        skipped: usize,
    },

    /// Catalogue could not be loaded
    CatalogFailed { error: String },
}

/// Trait for reporting progress events while loading the catalogue.
///
/// Implementations can use this to display a spinner, log messages,
/// or collect events in tests.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
