//! Data model for the viewing-history pipeline.
//!
//! A [`ViewingTable`] is the whole export held in memory: trimmed headers plus
//! one [`ViewingRecord`] per row. Records carry their raw cells untouched and
//! are enriched in place with derived temporal and duration fields. All
//! aggregation outputs ([`RankingEntry`], [`HeatmapTable`], [`BingeEvent`],
//! [`ViewingSummary`]) are computed fresh on every run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Weekday names in fixed Monday-first order.
///
/// Every weekday-keyed output uses exactly these seven rows, zero-filled,
/// regardless of which weekdays actually appear in the data.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ── ViewingRecord ─────────────────────────────────────────────────────────────

/// One row of the source table: raw cells plus derived fields.
///
/// Raw cells are immutable as ingested (an empty string marks a missing
/// value). Derived fields are all optional; an unparseable cell degrades to
/// `None` for that record only and never aborts the run.
#[derive(Debug, Clone, Default)]
pub struct ViewingRecord {
    /// Raw cell values, index-aligned with the table headers.
    pub cells: Vec<String>,
    /// Parsed viewing instant, or `None` when the raw value was unparseable.
    pub parsed_timestamp: Option<DateTime<Utc>>,
    /// Calendar date of the viewing.
    pub date: Option<NaiveDate>,
    /// Weekday name from [`WEEKDAYS`].
    pub weekday: Option<&'static str>,
    /// Hour of day, 0–23.
    pub hour: Option<u32>,
    /// Year-month label, e.g. `"2024-03"`.
    pub month: Option<String>,
    /// Viewing duration in minutes (non-negative), or `None` when
    /// undeterminable.
    pub minutes: Option<f64>,
}

impl ViewingRecord {
    /// Build a record from raw cells with all derived fields unset.
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Return the raw cell at `index`, treating empty and whitespace-only
    /// cells as missing.
    pub fn cell(&self, index: usize) -> Option<&str> {
        match self.cells.get(index) {
            Some(value) if !value.trim().is_empty() => Some(value.as_str()),
            _ => None,
        }
    }
}

// ── ViewingTable ──────────────────────────────────────────────────────────────

/// The full export: header names plus every record, read once and held in
/// memory for the duration of the run.
#[derive(Debug, Clone, Default)]
pub struct ViewingTable {
    /// Column names, whitespace-trimmed, in source order.
    pub headers: Vec<String>,
    /// One record per source row, in source order.
    pub records: Vec<ViewingRecord>,
}

impl ViewingTable {
    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of records (rows) in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header name for a column index, if in range.
    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(|h| h.as_str())
    }
}

// ── RoleAssignment ────────────────────────────────────────────────────────────

/// One-time mapping from logical role to a concrete column index.
///
/// Computed once from the full table and applied uniformly to every record;
/// it never changes during a run. `timestamp` and `duration` may be
/// unassigned (downstream stages then derive by fallback); `title` always
/// resolves, defaulting to the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    pub timestamp: Option<usize>,
    pub duration: Option<usize>,
    pub title: usize,
}

impl RoleAssignment {
    /// `true` when `column` is the assigned timestamp column.
    pub fn is_timestamp(&self, column: usize) -> bool {
        self.timestamp == Some(column)
    }

    /// `true` when `column` is the assigned title column.
    pub fn is_title(&self, column: usize) -> bool {
        self.title == column
    }
}

// ── RankingEntry ──────────────────────────────────────────────────────────────

/// One row of a ranking table: a title and its metric value (view count or
/// total minutes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub title: String,
    pub value: f64,
}

// ── HeatmapTable ──────────────────────────────────────────────────────────────

/// Weekday × hour minute sums: always exactly 7 rows (Monday→Sunday) and 24
/// columns, with missing combinations left at zero.
#[derive(Debug, Clone)]
pub struct HeatmapTable {
    cells: [[f64; 24]; 7],
}

impl Default for HeatmapTable {
    fn default() -> Self {
        Self {
            cells: [[0.0; 24]; 7],
        }
    }
}

impl HeatmapTable {
    /// Add `minutes` to the (weekday, hour) bucket. Out-of-range hours are
    /// ignored rather than panicking.
    pub fn add(&mut self, weekday: usize, hour: u32, minutes: f64) {
        if weekday < 7 && hour < 24 {
            self.cells[weekday][hour as usize] += minutes;
        }
    }

    /// Minute sum for a (weekday, hour) bucket; zero when out of range.
    pub fn get(&self, weekday: usize, hour: u32) -> f64 {
        if weekday < 7 && hour < 24 {
            self.cells[weekday][hour as usize]
        } else {
            0.0
        }
    }

    /// Iterate rows in Monday-first order as `(weekday_name, &[f64; 24])`.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, &[f64; 24])> {
        WEEKDAYS.iter().copied().zip(self.cells.iter())
    }

    /// Largest single-cell value, used for color scaling.
    pub fn max_value(&self) -> f64 {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}

// ── BingeEvent ────────────────────────────────────────────────────────────────

/// Same title watched at least three times within one calendar date.
///
/// This is same-day repetition, not temporal adjacency: three plays spread
/// over a whole day still count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BingeEvent {
    pub date: NaiveDate,
    pub title: String,
    pub count: u32,
}

// ── ViewingSummary ────────────────────────────────────────────────────────────

/// The five top-level scalars reported for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewingSummary {
    /// Total number of viewing records.
    pub total_sessions: usize,
    /// Sum of all minute values (nulls contribute zero).
    pub total_minutes: f64,
    /// Whole hours watched (floor of `total_minutes / 60`).
    pub total_hours: u64,
    /// Title with the most views, or `None` on empty input.
    pub top_title_by_views: Option<String>,
    /// Title with the most minutes, or `None` on empty input.
    pub top_title_by_time: Option<String>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
