// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, RecordError};
use crate::genre::GenreId;

/// Unique identifier of a podcast in the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PodcastId(pub String);

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last-updated timestamp of a podcast
///
/// Values that could not be parsed keep their raw text so callers can report
/// them instead of silently treating them as some arbitrary date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Updated {
    Parsed(DateTime<Utc>),
    Malformed(String),
}

impl Updated {
    /// The parsed instant, if any
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Updated::Parsed(dt) => Some(*dt),
            Updated::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Updated::Malformed(_))
    }
}

/// A validated podcast record
#[derive(Debug, Clone, PartialEq)]
pub struct Podcast {
    pub id: PodcastId,
    pub title: String,
    pub description: String,
    pub image_url: Option<Url>,
    pub seasons: Option<u32>,
    pub genres: Vec<GenreId>,
    pub updated: Updated,
}

/// A podcast object exactly as the API delivers it
///
/// Every field is loosely typed; [`Podcast::try_from`] does the validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPodcast {
    pub id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub seasons: Option<Value>,
    #[serde(default)]
    pub genres: Vec<Value>,
    #[serde(default)]
    pub updated: Option<Value>,
}

impl TryFrom<RawPodcast> for Podcast {
    type Error = RecordError;

    fn try_from(raw: RawPodcast) -> Result<Self, Self::Error> {
        let id = match &raw.id {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
            other => return Err(RecordError::InvalidId(other.to_string())),
        };

        let title = raw.title.as_deref().map(decode_text).unwrap_or_default();
        if title.is_empty() {
            return Err(RecordError::EmptyTitle { id });
        }

        let genres: Vec<GenreId> = raw
            .genres
            .iter()
            .filter_map(|value| {
                let genre = parse_genre_id(value);
                if genre.is_none() {
                    warn!(podcast = %id, genre = %value, "dropping invalid genre id");
                }
                genre
            })
            .collect();

        let updated = match &raw.updated {
            Some(Value::String(s)) => parse_updated(s),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(Updated::Parsed)
                .unwrap_or_else(|| Updated::Malformed(n.to_string())),
            Some(other) => Updated::Malformed(other.to_string()),
            None => Updated::Malformed(String::new()),
        };
        if let Updated::Malformed(text) = &updated {
            debug!(podcast = %id, updated = %text, "unparseable updated timestamp");
        }

        Ok(Podcast {
            id: PodcastId(id),
            title,
            description: raw
                .description
                .as_deref()
                .map(decode_text)
                .unwrap_or_default(),
            image_url: raw.image.as_deref().and_then(|s| Url::parse(s).ok()),
            seasons: raw
                .seasons
                .as_ref()
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            genres,
            updated,
        })
    }
}

/// Result of parsing a catalogue document
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub podcasts: Vec<Podcast>,
    /// Number of entries rejected during validation
    pub skipped: usize,
}

/// Parse a catalogue JSON document into validated podcasts
///
/// The document must be a JSON array. Individual entries that fail to
/// deserialize or validate are skipped and counted, never failing the whole
/// document.
pub fn parse_podcasts(json_bytes: &[u8]) -> Result<Catalogue, FetchError> {
    let entries: Vec<Value> = serde_json::from_slice(json_bytes)?;

    let mut catalogue = Catalogue::default();
    for entry in entries {
        let podcast = serde_json::from_value::<RawPodcast>(entry)
            .map_err(|e| e.to_string())
            .and_then(|raw| Podcast::try_from(raw).map_err(|e| e.to_string()));

        match podcast {
            Ok(podcast) => catalogue.podcasts.push(podcast),
            Err(reason) => {
                warn!(%reason, "skipping invalid podcast record");
                catalogue.skipped += 1;
            }
        }
    }

    Ok(catalogue)
}

/// Parse an `updated` timestamp
///
/// RFC 3339 is tried first; a few relaxed forms without offset are read as UTC.
pub fn parse_updated(date_str: &str) -> Updated {
    let trimmed = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Updated::Parsed(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for format in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Updated::Parsed(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Updated::Parsed(midnight.and_utc());
    }

    Updated::Malformed(date_str.to_string())
}

fn parse_genre_id(value: &Value) -> Option<GenreId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).map(GenreId),
        Value::String(s) => s.trim().parse().ok().map(GenreId),
        _ => None,
    }
}

fn decode_text(text: &str) -> String {
    html_escape::decode_html_entities(text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_CATALOGUE: &str = r#"[
      {
        "id": "10716",
        "title": "Something Was Wrong",
        "description": "An Emmy-nominated docuseries &amp; more",
        "seasons": 14,
        "image": "https://content.production.cdn.art19.com/images/cc/e5/0a/08/cce50a08.jpeg",
        "genres": [1, 2],
        "updated": "2022-11-03T07:00:00.000Z"
      },
      {
        "id": 5675,
        "title": "This American Life",
        "description": "",
        "seasons": 1,
        "genres": ["5"],
        "updated": "2022-10-24"
      }
    ]"#;

    #[test]
    fn parse_podcasts_extracts_fields() {
        let catalogue = parse_podcasts(SAMPLE_CATALOGUE.as_bytes()).unwrap();

        assert_eq!(catalogue.skipped, 0);
        assert_eq!(catalogue.podcasts.len(), 2);

        let first = &catalogue.podcasts[0];
        assert_eq!(first.id, PodcastId("10716".to_string()));
        assert_eq!(first.title, "Something Was Wrong");
        assert_eq!(first.description, "An Emmy-nominated docuseries & more");
        assert_eq!(first.seasons, Some(14));
        assert!(first.image_url.is_some());
        assert_eq!(first.genres, vec![GenreId(1), GenreId(2)]);
        assert_eq!(
            first.updated,
            Updated::Parsed(Utc.with_ymd_and_hms(2022, 11, 3, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_podcasts_accepts_loose_types() {
        let catalogue = parse_podcasts(SAMPLE_CATALOGUE.as_bytes()).unwrap();

        let second = &catalogue.podcasts[1];
        assert_eq!(second.id, PodcastId("5675".to_string()));
        assert_eq!(second.genres, vec![GenreId(5)]);
        assert!(second.image_url.is_none());
        assert_eq!(
            second.updated,
            Updated::Parsed(Utc.with_ymd_and_hms(2022, 10, 24, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_podcasts_skips_invalid_records() {
        let json = r#"[
          {"id": "1", "title": "   ", "genres": [1], "updated": "2022-01-01"},
          {"id": true, "title": "Bad Id", "genres": [], "updated": "2022-01-01"},
          {"title": "No Id"},
          {"id": "5", "title": "Good", "genres": [3], "updated": "2022-01-01"}
        ]"#;

        let catalogue = parse_podcasts(json.as_bytes()).unwrap();

        assert_eq!(catalogue.skipped, 3);
        assert_eq!(catalogue.podcasts.len(), 1);
        assert_eq!(catalogue.podcasts[0].title, "Good");
    }

    #[test]
    fn invalid_genre_entries_are_dropped_not_the_record() {
        let json = r#"[
          {"id": "7", "title": "Mixed Genres", "genres": [1, "comedy", -2, 1.0, "4"]}
        ]"#;

        let catalogue = parse_podcasts(json.as_bytes()).unwrap();

        assert_eq!(catalogue.skipped, 0);
        assert_eq!(catalogue.podcasts.len(), 1);
        assert_eq!(catalogue.podcasts[0].genres, vec![GenreId(1), GenreId(4)]);
    }

    #[test]
    fn parse_podcasts_rejects_non_array_document() {
        let result = parse_podcasts(br#"{"podcasts": []}"#);
        assert!(matches!(result, Err(FetchError::ParseFailed(_))));
    }

    #[test]
    fn malformed_timestamp_is_kept_not_rejected() {
        let json = r#"[{"id": "1", "title": "Odd Date", "genres": [], "updated": "last tuesday"}]"#;
        let catalogue = parse_podcasts(json.as_bytes()).unwrap();

        assert_eq!(catalogue.podcasts.len(), 1);
        assert_eq!(
            catalogue.podcasts[0].updated,
            Updated::Malformed("last tuesday".to_string())
        );
    }

    #[test]
    fn missing_timestamp_is_malformed() {
        let json = r#"[{"id": "1", "title": "No Date", "genres": []}]"#;
        let catalogue = parse_podcasts(json.as_bytes()).unwrap();
        assert!(catalogue.podcasts[0].updated.is_malformed());
    }

    #[test]
    fn numeric_timestamp_is_epoch_millis() {
        let json = r#"[{"id": "1", "title": "Millis", "genres": [], "updated": 86400000}]"#;
        let catalogue = parse_podcasts(json.as_bytes()).unwrap();
        assert_eq!(
            catalogue.podcasts[0].updated,
            Updated::Parsed(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_updated_handles_offsets_and_relaxed_forms() {
        let expected = Utc.with_ymd_and_hms(2023, 5, 1, 10, 30, 0).unwrap();

        assert_eq!(
            parse_updated("2023-05-01T12:30:00+02:00"),
            Updated::Parsed(expected)
        );
        assert_eq!(
            parse_updated("2023-05-01T10:30:00"),
            Updated::Parsed(expected)
        );
        assert_eq!(
            parse_updated("2023-05-01 10:30:00"),
            Updated::Parsed(expected)
        );
        assert!(parse_updated("2023-13-45").is_malformed());
        assert!(parse_updated("").is_malformed());
    }
}
