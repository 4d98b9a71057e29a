pub mod collate;
pub mod command;
pub mod config;
pub mod error;
pub mod fetch;
pub mod genre;
pub mod http;
pub mod pipeline;
pub mod podcast;
pub mod progress;
pub mod selector;
pub mod session;

// Re-export main types for convenience
pub use collate::compare_titles;
pub use command::{Command, HELP};
pub use config::{Config, DEFAULT_API_URL};
pub use error::{CommandError, ConfigError, FetchError, RecordError};
pub use fetch::{fetch_podcasts, is_url, load_catalogue, parse_podcasts_file};
pub use genre::{GENRES, Genre, GenreId, genre_name, genre_names};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use pipeline::{Derived, derive};
pub use podcast::{Catalogue, Podcast, PodcastId, RawPodcast, Updated, parse_podcasts};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use selector::{
    DEFAULT_DISPLAY_COUNT, DisplayCount, GenreFilter, PagingPolicy, SortOption, ViewState,
};
pub use session::{LoadState, Session, Status};
