//! Genre and year predicates over the base dataset

use crate::domain::{
    record::{Catalog, TrackRecord, YEAR_MAX, YEAR_MIN},
    selection::YearRange,
};

/// Genre predicate; the "All" sentinel disables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreFilter {
    All,
    Genre(String),
}

impl GenreFilter {
    /// Maps the selector value coming from the UI layer.
    pub fn from_selector(value: &str) -> Self {
        if value == "All" {
            Self::All
        } else {
            Self::Genre(value.to_string())
        }
    }

    /// A record passes when any of its genres equals the selected one,
    /// case-insensitively.
    pub fn matches(&self, record: &TrackRecord) -> bool {
        match self {
            Self::All => true,
            Self::Genre(wanted) => {
                let wanted = wanted.to_lowercase();
                record.genres.iter().any(|g| g.to_lowercase() == wanted)
            }
        }
    }
}

impl Default for GenreFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Applies the genre and year predicates, preserving dataset order.
///
/// Recomputed from the full base dataset on every call; the result is
/// a projection, never a mutation.
pub fn filtered_view<'a>(
    catalog: &'a Catalog,
    genre: &GenreFilter,
    range: YearRange,
) -> Vec<&'a TrackRecord> {
    catalog
        .records()
        .iter()
        .filter(|record| genre.matches(record))
        .filter(|record| match record.release_year() {
            Some(year) => (YEAR_MIN..=YEAR_MAX).contains(&year) && range.contains(year),
            None => false,
        })
        .collect()
}
