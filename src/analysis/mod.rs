//! Pure recomputation pipeline: filter, aggregate, summarize
//!
//! Everything here derives fresh view-models from the full base
//! dataset; nothing is cached or mutated in place. The caller owns the
//! "when to recompute" policy.

use serde::Serialize;

use crate::{
    analysis::{
        aggregate::{
            ArtistRank, GenreCount, GenreTrend, HistogramBin, TrackRank, YearlyDuration,
            duration_histogram, genre_counts, genre_popularity_trend, top_artists, top_tracks,
            yearly_average_duration,
        },
        filter::{GenreFilter, filtered_view},
    },
    domain::{record::{Catalog, TrackRecord}, selection::YearRange},
};

pub mod aggregate;
pub mod filter;
pub mod group;

/// Current selection driving a recompute.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub genre: GenreFilter,
    pub range: YearRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub avg_popularity: f64,
    pub avg_duration_minutes: f64,
    pub track_count: usize,
}

/// Means over the filtered view; all zeros when it is empty.
pub fn summary_statistics(view: &[&TrackRecord]) -> SummaryStatistics {
    if view.is_empty() {
        return SummaryStatistics {
            avg_popularity: 0.0,
            avg_duration_minutes: 0.0,
            track_count: 0,
        };
    }

    let n = view.len() as f64;
    let popularity_sum: f64 = view.iter().map(|r| r.popularity as f64).sum();
    let minutes_sum: f64 = view.iter().map(|r| r.duration_minutes()).sum();

    SummaryStatistics {
        avg_popularity: popularity_sum / n,
        avg_duration_minutes: minutes_sum / n,
        track_count: view.len(),
    }
}

/// Everything the rendering layer consumes, derived in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModels {
    pub summary: SummaryStatistics,
    pub genre_counts: Vec<GenreCount>,
    pub duration_histogram: Vec<HistogramBin>,
    pub yearly_duration: Vec<YearlyDuration>,
    pub top_artists: Vec<ArtistRank>,
    pub top_tracks: Vec<TrackRank>,
    pub genre_trend: Vec<GenreTrend>,
}

/// Recomputes every view-model from the full base dataset.
pub fn recompute_view_models(catalog: &Catalog, filters: &Filters) -> ViewModels {
    let view = filtered_view(catalog, &filters.genre, filters.range);

    ViewModels {
        summary: summary_statistics(&view),
        genre_counts: genre_counts(&view),
        duration_histogram: duration_histogram(&view),
        yearly_duration: yearly_average_duration(&view),
        top_artists: top_artists(&view),
        top_tracks: top_tracks(&view),
        genre_trend: genre_popularity_trend(&view),
    }
}
