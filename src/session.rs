// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::FetchError;
use crate::fetch::load_catalogue;
use crate::http::HttpClient;
use crate::pipeline::{Derived, derive};
use crate::podcast::{Catalogue, Podcast};
use crate::progress::SharedProgressReporter;
use crate::selector::ViewState;

type LoadResult = Result<Catalogue, FetchError>;

/// Where the catalogue load stands
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Catalogue),
    Failed(String),
}

/// What the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Loading,
    Failed(&'a str),
    /// Loaded, but nothing matches the selectors
    Empty,
    Results,
}

/// A browsing session: the catalogue load plus the current selectors
///
/// The catalogue is fetched once by a background task. If the session is
/// dropped first, the task's result is discarded.
pub struct Session {
    load: LoadState,
    load_rx: Option<oneshot::Receiver<LoadResult>>,
    view: ViewState,
    load_more_step: usize,
}

impl Session {
    /// Start loading `source` on the current tokio runtime
    pub fn start<C>(
        client: C,
        source: impl Into<String>,
        reporter: SharedProgressReporter,
        view: ViewState,
        load_more_step: usize,
    ) -> Self
    where
        C: HttpClient + 'static,
    {
        let source = source.into();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = load_catalogue(&client, &source, &reporter).await;
            if tx.send(result).is_err() {
                debug!(source = %source, "session gone before catalogue arrived, discarding");
            }
        });

        Self {
            load: LoadState::Loading,
            load_rx: Some(rx),
            view,
            load_more_step,
        }
    }

    /// Create a session from an already completed load
    pub fn from_result(result: LoadResult, view: ViewState, load_more_step: usize) -> Self {
        let mut session = Self {
            load: LoadState::Loading,
            load_rx: None,
            view,
            load_more_step,
        };
        session.finish(result.map_err(|e| e.to_string()));
        session
    }

    /// Check for a finished load without blocking
    ///
    /// Returns `true` if the load state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.load_rx.as_mut() else {
            return false;
        };

        let outcome = match rx.try_recv() {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err("catalogue loader stopped unexpectedly".to_string()),
        };

        self.load_rx = None;
        self.finish(outcome);
        true
    }

    /// Wait until the load has finished
    pub async fn wait(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        let outcome = match rx.await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err("catalogue loader stopped unexpectedly".to_string()),
        };
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: Result<Catalogue, String>) {
        self.load = match outcome {
            Ok(catalogue) => LoadState::Loaded(catalogue),
            Err(message) => {
                warn!(error = %message, "podcasts unavailable");
                LoadState::Failed(message)
            }
        };
    }

    /// Where the catalogue load currently stands
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    /// Loaded records; empty while loading or after a failure
    pub fn records(&self) -> &[Podcast] {
        match &self.load {
            LoadState::Loaded(catalogue) => &catalogue.podcasts,
            LoadState::Loading | LoadState::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Apply an interactive command to the selectors
    pub fn apply(&mut self, command: &Command) {
        let view = std::mem::take(&mut self.view);
        self.view = view.apply(command, self.load_more_step);
    }

    /// Derive the visible list from the current records and selectors
    pub fn derive(&self) -> Derived<'_> {
        derive(self.records(), &self.view)
    }

    /// Classify what should be rendered for `derived`
    pub fn status(&self, derived: &Derived<'_>) -> Status<'_> {
        match &self.load {
            LoadState::Loading => Status::Loading,
            LoadState::Failed(message) => Status::Failed(message.as_str()),
            LoadState::Loaded(_) if derived.visible.is_empty() => Status::Empty,
            LoadState::Loaded(_) => Status::Results,
        }
    }
}
