//! The six chart aggregators
//!
//! Each one is a pure function from the filtered view to the
//! view-model its chart consumes. An empty view yields an empty
//! result, never an error.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{
    analysis::group::{OrderedGroups, rank_and_truncate},
    domain::record::{TrackRecord, YEAR_MAX, YEAR_MIN},
};

/// Buckets kept by the genre-count chart.
const GENRE_BUCKET_LIMIT: usize = 12;
/// Series drawn by the genre-trend chart.
const TREND_SERIES_LIMIT: usize = 5;
/// Entries kept by both top-10 rankings.
const RANKING_LIMIT: usize = 10;

const HISTOGRAM_MIN: f64 = 0.0;
const HISTOGRAM_MAX: f64 = 10.0;
const HISTOGRAM_BINS: usize = 20;

/// Display names longer than this are shortened for axis labels.
const DISPLAY_NAME_LIMIT: usize = 25;
const DISPLAY_NAME_KEPT: usize = 23;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyDuration {
    pub year: i32,
    pub avg_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRank {
    pub name: String,
    pub followers: u64,
    pub genres: Vec<String>,
    /// Axis label: name plus up to two genres in parentheses.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRank {
    pub rank: usize,
    /// Display form, shortened when the full name is long.
    pub name: String,
    pub full_name: String,
    pub artist: String,
    pub popularity: u32,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub avg_popularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreTrend {
    pub genre: String,
    pub points: Vec<TrendPoint>,
}

/// Per-genre record counts in first-seen order. A multi-genre record
/// contributes to every bucket it belongs to, so the counts may sum to
/// more than the record count.
fn raw_genre_counts(view: &[&TrackRecord]) -> Vec<(String, u64)> {
    let mut counts: OrderedGroups<String, u64> = OrderedGroups::new();
    for record in view {
        for genre in &record.genres {
            *counts.entry(genre.clone(), || 0) += 1;
        }
    }
    counts.into_entries()
}

/// Genre market-share chart: top 12 genres by record count, ties in
/// first-seen order.
pub fn genre_counts(view: &[&TrackRecord]) -> Vec<GenreCount> {
    rank_and_truncate(raw_genre_counts(view), GENRE_BUCKET_LIMIT, |(_, n)| *n)
        .into_iter()
        .map(|(genre, count)| GenreCount { genre, count })
        .collect()
}

/// Duration distribution over a fixed [0, 10] minute domain in 20
/// half-open bins, sparse: empty bins are omitted.
///
/// Values strictly outside the domain are discarded, not clamped; a
/// value exactly at 10 folds into the last bin.
pub fn duration_histogram(view: &[&TrackRecord]) -> Vec<HistogramBin> {
    let bin_width = (HISTOGRAM_MAX - HISTOGRAM_MIN) / HISTOGRAM_BINS as f64;
    let mut counts = [0u64; HISTOGRAM_BINS];

    for record in view {
        let minutes = record.duration_minutes();
        if !minutes.is_finite() || minutes < HISTOGRAM_MIN || minutes > HISTOGRAM_MAX {
            continue;
        }
        let index = (((minutes - HISTOGRAM_MIN) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[index] += 1;
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(index, count)| HistogramBin {
            lower: HISTOGRAM_MIN + index as f64 * bin_width,
            upper: HISTOGRAM_MIN + (index + 1) as f64 * bin_width,
            count: *count,
        })
        .collect()
}

/// Mean track duration per release year, ascending. Years without a
/// qualifying record are absent, not zero-filled; only records with a
/// strictly positive duration qualify.
pub fn yearly_average_duration(view: &[&TrackRecord]) -> Vec<YearlyDuration> {
    let mut by_year: BTreeMap<i32, (f64, u64)> = BTreeMap::new();

    for record in view {
        let Some(year) = record.release_year() else {
            continue;
        };
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            continue;
        }
        let minutes = record.duration_minutes();
        if !minutes.is_finite() || minutes <= 0.0 {
            continue;
        }
        let slot = by_year.entry(year).or_insert((0.0, 0));
        slot.0 += minutes;
        slot.1 += 1;
    }

    by_year
        .into_iter()
        .map(|(year, (sum, n))| YearlyDuration {
            year,
            avg_minutes: sum / n as f64,
        })
        .collect()
}

/// Up to `max` genres in parentheses, with an ellipsis when more exist.
/// Empty when no presentable genre remains.
pub fn format_genre_suffix(genres: &[String], max: usize) -> String {
    let shown: Vec<&str> = genres
        .iter()
        .take(max)
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    if shown.is_empty() {
        return String::new();
    }
    let ellipsis = if genres.len() > max { "…" } else { "" };
    format!(" ({}{})", shown.join(", "), ellipsis)
}

struct ArtistAcc {
    followers: u64,
    genres: Vec<String>,
}

/// Top 10 artists by follower count.
///
/// Repeat appearances resolve to the maximum observed follower count
/// and the insertion-ordered union of genres. Records with an empty
/// artist name or a zero follower count are excluded.
pub fn top_artists(view: &[&TrackRecord]) -> Vec<ArtistRank> {
    let mut artists: OrderedGroups<String, ArtistAcc> = OrderedGroups::new();

    for record in view {
        if record.artist_name.is_empty() || record.artist_followers == 0 {
            continue;
        }
        let acc = artists.entry(record.artist_name.clone(), || ArtistAcc {
            followers: 0,
            genres: Vec::new(),
        });
        acc.followers = acc.followers.max(record.artist_followers);
        for genre in &record.genres {
            if !acc.genres.contains(genre) {
                acc.genres.push(genre.clone());
            }
        }
    }

    rank_and_truncate(artists.into_entries(), RANKING_LIMIT, |(_, acc)| acc.followers)
        .into_iter()
        .map(|(name, acc)| {
            let label = format!("{}{}", name, format_genre_suffix(&acc.genres, 2));
            ArtistRank {
                name,
                followers: acc.followers,
                genres: acc.genres,
                label,
            }
        })
        .collect()
}

fn display_name(full_name: &str) -> String {
    if full_name.chars().count() > DISPLAY_NAME_LIMIT {
        let head: String = full_name.chars().take(DISPLAY_NAME_KEPT).collect();
        format!("{head}...")
    } else {
        full_name.to_string()
    }
}

/// Top 10 tracks by popularity, stable over the filtered-view order,
/// deduplicated by source id or the name+artist composite key.
pub fn top_tracks(view: &[&TrackRecord]) -> Vec<TrackRank> {
    let mut candidates: Vec<&TrackRecord> = view
        .iter()
        .copied()
        .filter(|record| !record.name.is_empty())
        .collect();
    candidates.sort_by(|a, b| b.popularity.cmp(&a.popularity));

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for record in candidates {
        if unique.len() >= RANKING_LIMIT {
            break;
        }
        if seen.insert(record.dedup_key()) {
            unique.push(record);
        }
    }

    unique
        .into_iter()
        .enumerate()
        .map(|(index, record)| TrackRank {
            rank: index + 1,
            name: display_name(&record.name),
            full_name: record.name.clone(),
            artist: record.artist_name.clone(),
            popularity: record.popularity,
            genres: record.genres.clone(),
        })
        .collect()
}

/// Mean popularity per year for the five busiest genres of the view.
///
/// Series appear in the order their genre was first encountered during
/// the accumulation pass; a series with no qualifying year-bucket is
/// dropped entirely. Points ascend by year.
pub fn genre_popularity_trend(view: &[&TrackRecord]) -> Vec<GenreTrend> {
    let top: Vec<String> =
        rank_and_truncate(raw_genre_counts(view), TREND_SERIES_LIMIT, |(_, n)| *n)
            .into_iter()
            .map(|(genre, _)| genre)
            .collect();
    if top.is_empty() {
        return Vec::new();
    }
    let wanted: HashSet<&String> = top.iter().collect();

    let mut series: OrderedGroups<String, BTreeMap<i32, (f64, u64)>> = OrderedGroups::new();
    for record in view {
        let Some(year) = record.release_year() else {
            continue;
        };
        for genre in &record.genres {
            if !wanted.contains(genre) {
                continue;
            }
            let buckets = series.entry(genre.clone(), BTreeMap::new);
            let slot = buckets.entry(year).or_insert((0.0, 0));
            slot.0 += record.popularity as f64;
            slot.1 += 1;
        }
    }

    series
        .into_entries()
        .into_iter()
        .filter(|(_, buckets)| !buckets.is_empty())
        .map(|(genre, buckets)| GenreTrend {
            genre,
            points: buckets
                .into_iter()
                .map(|(year, (sum, n))| TrendPoint {
                    year,
                    avg_popularity: sum / n as f64,
                })
                .collect(),
        })
        .collect()
}
