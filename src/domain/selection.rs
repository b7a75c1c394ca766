//! Dual-ended year selection and its text-entry mirrors

use serde::Serialize;

use crate::domain::record::{YEAR_MAX, YEAR_MIN};

/// Which end of the selection a slider handle or text field drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// Inclusive year window within [`YEAR_MIN`, `YEAR_MAX`].
///
/// `start <= end` holds at all times; the only mutation path is
/// [`YearRange::set`], which clamps and pushes the opposite endpoint
/// instead of letting the handles cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self::full()
    }
}

impl YearRange {
    /// The whole catalog domain.
    pub fn full() -> Self {
        Self {
            start: YEAR_MIN,
            end: YEAR_MAX,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// Rounds a raw slider value to the nearest year inside the domain.
    /// NaN maps to the lower bound.
    pub fn clamp_year(value: f64) -> i32 {
        if value.is_nan() {
            return YEAR_MIN;
        }
        (value.round() as i64).clamp(YEAR_MIN as i64, YEAR_MAX as i64) as i32
    }

    /// Moves one endpoint to a raw value.
    ///
    /// Dragging a handle past the other pushes the other handle along
    /// rather than crossing it.
    pub fn set(self, endpoint: Endpoint, raw: f64) -> Self {
        let value = Self::clamp_year(raw);
        match endpoint {
            Endpoint::Start => {
                let start = value.min(self.end);
                let end = if self.end < start { start } else { self.end };
                Self { start, end }
            }
            Endpoint::End => {
                let end = value.max(self.start);
                let start = if self.start > end { end } else { self.start };
                Self { start, end }
            }
        }
    }
}

/// Selection state plus the two free-text mirrors used for direct
/// numeric entry.
///
/// The mirrors accept digit-only edits and are resynchronized to the
/// committed range after every successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEditor {
    range: YearRange,
    start_text: String,
    end_text: String,
}

impl Default for RangeEditor {
    fn default() -> Self {
        Self::new(YearRange::full())
    }
}

impl RangeEditor {
    pub fn new(range: YearRange) -> Self {
        Self {
            range,
            start_text: range.start.to_string(),
            end_text: range.end.to_string(),
        }
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn text(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Start => &self.start_text,
            Endpoint::End => &self.end_text,
        }
    }

    fn text_mut(&mut self, endpoint: Endpoint) -> &mut String {
        match endpoint {
            Endpoint::Start => &mut self.start_text,
            Endpoint::End => &mut self.end_text,
        }
    }

    fn sync_mirrors(&mut self) {
        self.start_text = self.range.start.to_string();
        self.end_text = self.range.end.to_string();
    }

    /// Slider path: runs the transition rule and resyncs both mirrors.
    pub fn slide(&mut self, endpoint: Endpoint, raw: f64) {
        self.range = self.range.set(endpoint, raw);
        self.sync_mirrors();
    }

    /// Typing path. Non-digit text is rejected outright (the mirror
    /// keeps its previous content); returns whether the edit was taken.
    pub fn edit(&mut self, endpoint: Endpoint, text: &str) -> bool {
        if !text.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        *self.text_mut(endpoint) = text.to_string();
        true
    }

    /// Commit path: parses the mirror and runs it through the same
    /// transition rule as the slider. An empty mirror commits as zero
    /// and clamps to the lower bound; unparseable text reverts the
    /// mirror to the last committed value.
    pub fn commit(&mut self, endpoint: Endpoint) {
        let text = self.text(endpoint);
        let raw = if text.is_empty() {
            0.0
        } else {
            match text.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    let committed = match endpoint {
                        Endpoint::Start => self.range.start,
                        Endpoint::End => self.range.end,
                    };
                    *self.text_mut(endpoint) = committed.to_string();
                    return;
                }
            }
        };
        self.range = self.range.set(endpoint, raw);
        self.sync_mirrors();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_year() {
        assert_eq!(YearRange::clamp_year(2015.0), 2015);
        assert_eq!(YearRange::clamp_year(2015.4), 2015);
        assert_eq!(YearRange::clamp_year(2015.5), 2016);
        assert_eq!(YearRange::clamp_year(1990.0), YEAR_MIN);
        assert_eq!(YearRange::clamp_year(3000.0), YEAR_MAX);
        assert_eq!(YearRange::clamp_year(f64::NAN), YEAR_MIN);
    }

    #[test]
    fn test_set_start_within_range() {
        let range = YearRange::full().set(Endpoint::Start, 2015.0);
        assert_eq!(range, YearRange { start: 2015, end: YEAR_MAX });
    }

    #[test]
    fn test_start_past_end_collapses_to_end() {
        let range = YearRange { start: 2010, end: 2015 };
        let moved = range.set(Endpoint::Start, 2020.0);
        assert_eq!(moved, YearRange { start: 2015, end: 2015 });
    }

    #[test]
    fn test_end_past_start_collapses_to_start() {
        let range = YearRange { start: 2015, end: 2020 };
        let moved = range.set(Endpoint::End, 2010.0);
        assert_eq!(moved, YearRange { start: 2015, end: 2015 });
    }

    #[test]
    fn test_start_beyond_domain_clamps_then_collapses() {
        // clamp(3000) = 2025, which is above end 2015
        let range = YearRange { start: 2010, end: 2015 };
        let moved = range.set(Endpoint::Start, 3000.0);
        assert_eq!(moved, YearRange { start: 2015, end: 2015 });
    }

    #[test]
    fn test_invariant_holds_after_any_transition() {
        let mut range = YearRange::full();
        for (endpoint, raw) in [
            (Endpoint::Start, 2024.0),
            (Endpoint::End, 2009.0),
            (Endpoint::Start, f64::NAN),
            (Endpoint::End, -50.0),
            (Endpoint::Start, 1e12),
        ] {
            range = range.set(endpoint, raw);
            assert!(range.start <= range.end, "violated by {raw}");
            assert!(range.start >= YEAR_MIN && range.end <= YEAR_MAX);
        }
    }

    #[test]
    fn test_editor_rejects_non_digit_edits() {
        let mut editor = RangeEditor::default();
        assert!(!editor.edit(Endpoint::Start, "20a1"));
        assert_eq!(editor.text(Endpoint::Start), "2009");

        assert!(editor.edit(Endpoint::Start, "2015"));
        assert_eq!(editor.text(Endpoint::Start), "2015");
    }

    #[test]
    fn test_editor_commit_runs_transition() {
        let mut editor = RangeEditor::default();
        editor.edit(Endpoint::Start, "2018");
        editor.commit(Endpoint::Start);

        assert_eq!(editor.range(), YearRange { start: 2018, end: YEAR_MAX });
        assert_eq!(editor.text(Endpoint::Start), "2018");
    }

    #[test]
    fn test_editor_commit_empty_clamps_to_lower_bound() {
        let mut editor = RangeEditor::new(YearRange { start: 2015, end: 2020 });
        editor.edit(Endpoint::Start, "");
        editor.commit(Endpoint::Start);

        assert_eq!(editor.range(), YearRange { start: YEAR_MIN, end: 2020 });
        assert_eq!(editor.text(Endpoint::Start), "2009");
    }

    #[test]
    fn test_editor_commit_resyncs_both_mirrors() {
        let mut editor = RangeEditor::new(YearRange { start: 2012, end: 2014 });
        editor.edit(Endpoint::Start, "2020");
        editor.commit(Endpoint::Start);

        // start pushed end along; both mirrors reflect the new range
        assert_eq!(editor.range(), YearRange { start: 2014, end: 2014 });
        assert_eq!(editor.text(Endpoint::Start), "2014");
        assert_eq!(editor.text(Endpoint::End), "2014");
    }

    #[test]
    fn test_editor_slide_updates_mirrors() {
        let mut editor = RangeEditor::default();
        editor.slide(Endpoint::End, 2013.6);

        assert_eq!(editor.range(), YearRange { start: 2009, end: 2014 });
        assert_eq!(editor.text(Endpoint::End), "2014");
    }
}
