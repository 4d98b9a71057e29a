// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use bytes::Bytes;
use tracing::{info, warn};
use url::Url;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::podcast::{Catalogue, parse_podcasts};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Fetch raw catalogue bytes from a URL (without parsing)
pub async fn fetch_catalogue_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Bytes, FetchError> {
    Url::parse(url)?;

    let response = client.get(url).await.map_err(|e| FetchError::FetchFailed {
        url: url.to_string(),
        source: e,
    })?;

    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}

/// Read raw catalogue bytes from a local file (without parsing)
pub fn read_catalogue_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|e| FetchError::FileReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fetch and parse the podcast catalogue from a URL
pub async fn fetch_podcasts<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Catalogue, FetchError> {
    let bytes = fetch_catalogue_bytes(client, url).await?;
    parse_podcasts(&bytes)
}

/// Parse the podcast catalogue from a local JSON file
pub fn parse_podcasts_file(path: &Path) -> Result<Catalogue, FetchError> {
    let bytes = read_catalogue_file(path)?;
    parse_podcasts(&bytes)
}

/// Determine if a string is a URL or a file path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load the catalogue from a URL or file path, reporting progress
pub async fn load_catalogue<C: HttpClient + ?Sized>(
    client: &C,
    source: &str,
    reporter: &SharedProgressReporter,
) -> Result<Catalogue, FetchError> {
    let bytes = if is_url(source) {
        reporter.report(ProgressEvent::FetchingCatalog {
            url: source.to_string(),
        });
        fetch_catalogue_bytes(client, source).await.map(Vec::from)
    } else {
        read_catalogue_file(Path::new(source))
    };

    let result = bytes.and_then(|bytes| {
        reporter.report(ProgressEvent::ParsingCatalog {
            source: source.to_string(),
        });
        parse_podcasts(&bytes)
    });

    match &result {
        Ok(catalogue) => {
            info!(
                source,
                count = catalogue.podcasts.len(),
                skipped = catalogue.skipped,
                "catalogue loaded"
            );
            reporter.report(ProgressEvent::CatalogLoaded {
                count: catalogue.podcasts.len(),
                skipped: catalogue.skipped,
            });
        }
        Err(e) => {
            warn!(source, error = %e, "catalogue load failed");
            reporter.report(ProgressEvent::CatalogFailed {
                error: e.to_string(),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::http::HttpResponse;
    use crate::progress::{NoopReporter, ProgressReporter};

    const URL: &str = "https://example.com/podcasts";

    const CATALOGUE: &str = r#"[
      {"id": "1", "title": "Alpha", "genres": [1], "updated": "2024-01-03T00:00:00Z"},
      {"id": "2", "title": "beta", "genres": [2], "updated": "2024-01-01T00:00:00Z"}
    ]"#;

    struct MockHttpClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            Ok(HttpResponse {
                status: self.status,
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn is_url_detects_http() {
        assert!(is_url("http://example.com/podcasts"));
        assert!(is_url("https://podcast-api.netlify.app"));
    }

    #[test]
    fn is_url_rejects_file_paths() {
        assert!(!is_url("/path/to/podcasts.json"));
        assert!(!is_url("./podcasts.json"));
        assert!(!is_url("podcasts.json"));
    }

    #[tokio::test]
    async fn fetch_podcasts_parses_response() {
        let client = MockHttpClient {
            status: 200,
            body: CATALOGUE,
        };

        let catalogue = fetch_podcasts(&client, URL).await.unwrap();

        assert_eq!(catalogue.podcasts.len(), 2);
        assert_eq!(catalogue.podcasts[0].title, "Alpha");
    }

    #[tokio::test]
    async fn fetch_podcasts_reports_http_status() {
        let client = MockHttpClient {
            status: 503,
            body: "unavailable",
        };

        let result = fetch_podcasts(&client, URL).await;

        assert!(matches!(
            result,
            Err(FetchError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_podcasts_rejects_invalid_url() {
        let client = MockHttpClient {
            status: 200,
            body: CATALOGUE,
        };

        let result = fetch_podcasts(&client, "https://exa mple.com").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn fetch_podcasts_reports_bad_json() {
        let client = MockHttpClient {
            status: 200,
            body: "<html>oops</html>",
        };

        let result = fetch_podcasts(&client, URL).await;
        assert!(matches!(result, Err(FetchError::ParseFailed(_))));
    }

    #[test]
    fn parse_podcasts_file_reads_local_catalogue() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("podcasts.json");
        std::fs::write(&path, CATALOGUE).unwrap();

        let catalogue = parse_podcasts_file(&path).unwrap();
        assert_eq!(catalogue.podcasts.len(), 2);
    }

    #[test]
    fn parse_podcasts_file_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = parse_podcasts_file(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(FetchError::FileReadFailed { .. })));
    }

    #[tokio::test]
    async fn load_catalogue_reports_progress_for_urls() {
        let client = MockHttpClient {
            status: 200,
            body: CATALOGUE,
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        load_catalogue(&client, URL, &reporter).await.unwrap();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                ProgressEvent::FetchingCatalog {
                    url: URL.to_string()
                },
                ProgressEvent::ParsingCatalog {
                    source: URL.to_string()
                },
                ProgressEvent::CatalogLoaded {
                    count: 2,
                    skipped: 0
                },
            ]
        );
    }

    #[tokio::test]
    async fn load_catalogue_reads_files_without_fetching() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("podcasts.json");
        std::fs::write(&path, CATALOGUE).unwrap();
        let source = path.to_string_lossy().to_string();

        let client = MockHttpClient {
            status: 500,
            body: "",
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let catalogue = load_catalogue(&client, &source, &reporter).await.unwrap();

        assert_eq!(catalogue.podcasts.len(), 2);
        let events = recorder.events.lock().unwrap().clone();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ProgressEvent::FetchingCatalog { .. }))
        );
    }

    #[tokio::test]
    async fn load_catalogue_reports_failure() {
        let client = MockHttpClient {
            status: 404,
            body: "",
        };
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let result = load_catalogue(&client, URL, &reporter).await;

        assert!(result.is_err());
        let events = recorder.events.lock().unwrap().clone();
        assert!(matches!(
            events.last(),
            Some(ProgressEvent::CatalogFailed { .. })
        ));
    }

    #[tokio::test]
    async fn noop_reporter_is_accepted() {
        let client = MockHttpClient {
            status: 200,
            body: CATALOGUE,
        };

        let reporter = NoopReporter::shared();
        let catalogue = load_catalogue(&client, URL, &reporter).await.unwrap();
        assert_eq!(catalogue.podcasts.len(), 2);
    }
}
