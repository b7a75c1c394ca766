//! Raw CSV rows and their normalization into [`TrackRecord`]s

use serde::Deserialize;

use crate::domain::{
    genres::parse_genre_cell,
    record::{Provenance, TrackRecord, YEAR_MAX, YEAR_MIN, release_year},
};

/// One unparsed catalog row.
///
/// Both source conventions deserialize into this shape: the historical
/// catalog fills `track_duration_ms`, the modern one
/// `track_duration_min`. Everything stays a string here so that the
/// coercion fallbacks live in one place, [`RawRow::normalize`].
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub track_id: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub track_popularity: String,
    #[serde(default)]
    pub track_duration_ms: String,
    #[serde(default)]
    pub track_duration_min: String,
    #[serde(default)]
    pub explicit: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub artist_popularity: String,
    #[serde(default)]
    pub artist_followers: String,
    #[serde(default)]
    pub artist_genres: String,
    #[serde(default)]
    pub album_name: String,
    #[serde(default)]
    pub album_release_date: String,
    #[serde(default)]
    pub album_type: String,
}

impl RawRow {
    /// Applies the per-source coercion rules.
    ///
    /// Returns `None` when the release date does not resolve to a year
    /// within the catalog domain; every other malformed field falls
    /// back to its zero value instead of failing the row.
    pub fn normalize(self, provenance: Provenance) -> Option<TrackRecord> {
        let year = release_year(&self.album_release_date)?;
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return None;
        }

        let (duration_ms, truthy) = match provenance {
            Provenance::Historical => (coerce_u64(&self.track_duration_ms), "True"),
            Provenance::Modern => (minutes_to_ms(&self.track_duration_min), "TRUE"),
        };

        let explicit = self.explicit == truthy || self.explicit == "true";
        let id = if self.track_id.is_empty() {
            None
        } else {
            Some(self.track_id)
        };

        Some(TrackRecord {
            id,
            name: self.track_name,
            popularity: coerce_u32(&self.track_popularity),
            duration_ms,
            explicit,
            artist_name: self.artist_name,
            artist_popularity: coerce_u32(&self.artist_popularity),
            artist_followers: coerce_u64(&self.artist_followers),
            genres: parse_genre_cell(&self.artist_genres),
            album_name: self.album_name,
            release_date: self.album_release_date,
            album_type: self.album_type,
            provenance,
        })
    }
}

fn coerce_f64(cell: &str) -> f64 {
    cell.trim().parse().ok().filter(|v: &f64| v.is_finite()).unwrap_or(0.0)
}

fn coerce_u32(cell: &str) -> u32 {
    // float->int casts saturate, so negatives land on 0
    coerce_f64(cell) as u32
}

fn coerce_u64(cell: &str) -> u64 {
    coerce_f64(cell) as u64
}

fn minutes_to_ms(cell: &str) -> u64 {
    (coerce_f64(cell) * 60_000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn historical_row() -> RawRow {
        RawRow {
            track_id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
            track_name: "Never Gonna Give You Up".to_string(),
            track_popularity: "71".to_string(),
            track_duration_ms: "213573".to_string(),
            explicit: "True".to_string(),
            artist_name: "Rick Astley".to_string(),
            artist_popularity: "75".to_string(),
            artist_followers: "2606370".to_string(),
            artist_genres: "['dance rock', 'new wave pop']".to_string(),
            album_name: "Whenever You Need Somebody".to_string(),
            album_release_date: "2022-05-16".to_string(),
            album_type: "album".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_historical_row() {
        let record = historical_row().normalize(Provenance::Historical).unwrap();

        assert_eq!(record.id.as_deref(), Some("4uLU6hMCjMI75M1A2tKUQC"));
        assert_eq!(record.popularity, 71);
        assert_eq!(record.duration_ms, 213_573);
        assert!(record.explicit);
        assert_eq!(record.artist_followers, 2_606_370);
        assert_eq!(record.genres, vec!["dance rock", "new wave pop"]);
        assert_eq!(record.provenance, Provenance::Historical);
        assert_eq!(record.release_year(), Some(2022));
    }

    #[test]
    fn test_normalize_modern_row_derives_duration_from_minutes() {
        let row = RawRow {
            track_duration_min: "3.5".to_string(),
            album_release_date: "2025-02-14".to_string(),
            ..Default::default()
        };
        let record = row.normalize(Provenance::Modern).unwrap();

        assert_eq!(record.duration_ms, 210_000);
        assert_eq!(record.provenance, Provenance::Modern);
    }

    #[test]
    fn test_normalize_rejects_out_of_domain_dates() {
        for date in ["2008-12-31", "2026-01-01", "", "unknown"] {
            let row = RawRow {
                album_release_date: date.to_string(),
                ..historical_row()
            };
            assert!(row.normalize(Provenance::Historical).is_none(), "{date}");
        }
    }

    #[test]
    fn test_normalize_accepts_domain_boundaries() {
        for date in ["2009-01-01", "2025-12-31"] {
            let row = RawRow {
                album_release_date: date.to_string(),
                ..historical_row()
            };
            assert!(row.normalize(Provenance::Historical).is_some(), "{date}");
        }
    }

    #[test]
    fn test_numeric_coercion_falls_back_to_zero() {
        let row = RawRow {
            track_popularity: "not a number".to_string(),
            track_duration_ms: "".to_string(),
            artist_followers: "-3".to_string(),
            album_release_date: "2020".to_string(),
            ..Default::default()
        };
        let record = row.normalize(Provenance::Historical).unwrap();

        assert_eq!(record.popularity, 0);
        assert_eq!(record.duration_ms, 0);
        assert_eq!(record.artist_followers, 0);
    }

    #[test]
    fn test_explicit_flag_is_case_sensitive_per_source() {
        let row = |explicit: &str| RawRow {
            explicit: explicit.to_string(),
            album_release_date: "2020".to_string(),
            ..Default::default()
        };

        assert!(row("True").normalize(Provenance::Historical).unwrap().explicit);
        assert!(!row("TRUE").normalize(Provenance::Historical).unwrap().explicit);
        assert!(row("TRUE").normalize(Provenance::Modern).unwrap().explicit);
        assert!(!row("True").normalize(Provenance::Modern).unwrap().explicit);
        // the native-boolean spelling passes for both sources
        assert!(row("true").normalize(Provenance::Historical).unwrap().explicit);
        assert!(row("true").normalize(Provenance::Modern).unwrap().explicit);
        assert!(!row("False").normalize(Provenance::Historical).unwrap().explicit);
    }

    #[test]
    fn test_empty_track_id_becomes_absent() {
        let row = RawRow {
            album_release_date: "2020".to_string(),
            ..Default::default()
        };
        assert_eq!(row.normalize(Provenance::Historical).unwrap().id, None);
    }

    #[test]
    fn test_fractional_minutes_round_to_whole_ms() {
        let row = RawRow {
            track_duration_min: "3.333".to_string(),
            album_release_date: "2025".to_string(),
            ..Default::default()
        };
        assert_eq!(row.normalize(Provenance::Modern).unwrap().duration_ms, 199_980);
    }
}
