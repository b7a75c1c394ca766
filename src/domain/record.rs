use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// First release year the catalog covers.
pub const YEAR_MIN: i32 = 2009;
/// Last release year the catalog covers.
pub const YEAR_MAX: i32 = 2025;

/// Which source catalog a record came from.
///
/// Purely informational after ingestion; the duration derivation that
/// differs between the sources has already been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Historical,
    Modern,
}

/// One normalized music track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    /// Source track id; `None` when the source cell was empty.
    pub id: Option<String>,
    pub name: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub explicit: bool,
    pub artist_name: String,
    pub artist_popularity: u32,
    pub artist_followers: u64,
    pub genres: Vec<String>,
    pub album_name: String,
    /// Raw source string, kept for year extraction.
    pub release_date: String,
    pub album_type: String,
    pub provenance: Provenance,
}

impl TrackRecord {
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_ms as f64 / 60_000.0
    }

    /// Dedup key for the track ranking: source id when present,
    /// otherwise name + artist.
    pub fn dedup_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.name, self.artist_name),
        }
    }
}

/// Extracts the release year from a raw date string.
///
/// Both catalogs carry `YYYY-MM-DD`, `YYYY-MM` and bare `YYYY` forms;
/// anything else is unresolvable.
pub fn release_year(date: &str) -> Option<i32> {
    let date = date.trim();
    match date.split('-').count() {
        1 => {
            if date.len() == 4 && date.chars().all(|c| c.is_ascii_digit()) {
                date.parse().ok()
            } else {
                None
            }
        }
        2 => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d")
            .ok()
            .map(|d| d.year()),
        3 => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year()),
        _ => None,
    }
}

/// The immutable base dataset, assembled once at startup.
///
/// Every record is guaranteed to have a release year within
/// [`YEAR_MIN`, `YEAR_MAX`]; the loader drops anything else.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<TrackRecord>,
}

impl Catalog {
    pub fn new(records: Vec<TrackRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The "All" sentinel followed by every distinct genre, sorted.
    pub fn distinct_sorted_genres(&self) -> Vec<String> {
        let genres: BTreeSet<&String> = self.records.iter().flat_map(|r| &r.genres).collect();

        let mut out = Vec::with_capacity(genres.len() + 1);
        out.push("All".to_string());
        out.extend(genres.into_iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(release_date: &str, genres: &[&str]) -> TrackRecord {
        TrackRecord {
            id: Some("t1".to_string()),
            name: "Song".to_string(),
            popularity: 50,
            duration_ms: 180_000,
            explicit: false,
            artist_name: "Artist".to_string(),
            artist_popularity: 60,
            artist_followers: 1_000,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            album_name: "Album".to_string(),
            release_date: release_date.to_string(),
            album_type: "album".to_string(),
            provenance: Provenance::Historical,
        }
    }

    #[test]
    fn test_release_year_full_date() {
        assert_eq!(release_year("2021-06-25"), Some(2021));
    }

    #[test]
    fn test_release_year_year_month() {
        assert_eq!(release_year("2014-03"), Some(2014));
    }

    #[test]
    fn test_release_year_bare_year() {
        assert_eq!(release_year("2019"), Some(2019));
    }

    #[test]
    fn test_release_year_rejects_garbage() {
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("not a date"), None);
        assert_eq!(release_year("2021-13-45"), None);
        assert_eq!(release_year("21"), None);
    }

    #[test]
    fn test_dedup_key_prefers_id() {
        let track = record("2020-01-01", &[]);
        assert_eq!(track.dedup_key(), "t1");

        let mut anonymous = track.clone();
        anonymous.id = None;
        assert_eq!(anonymous.dedup_key(), "Song-Artist");
    }

    #[test]
    fn test_duration_minutes() {
        let track = record("2020-01-01", &[]);
        assert_eq!(track.duration_minutes(), 3.0);
    }

    #[test]
    fn test_distinct_sorted_genres_has_sentinel_first() {
        let catalog = Catalog::new(vec![
            record("2020-01-01", &["rock", "pop"]),
            record("2021-01-01", &["pop", "ambient"]),
        ]);

        assert_eq!(
            catalog.distinct_sorted_genres(),
            vec!["All", "ambient", "pop", "rock"]
        );
    }

    #[test]
    fn test_distinct_sorted_genres_empty_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.distinct_sorted_genres(), vec!["All"]);
    }
}
