//! Aggregation over enriched viewing records.
//!
//! Computes every table the report layer consumes: per-title rankings,
//! weekday × hour heatmap, monthly trend, daily series and binge detection.
//! All minute sums use ordinary floating-point addition; records with null
//! minutes contribute zero.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use lens_core::models::{
    BingeEvent, HeatmapTable, RankingEntry, RoleAssignment, ViewingRecord, ViewingSummary,
    ViewingTable, WEEKDAYS,
};

/// Minimum same-day plays of one title that count as a binge.
pub const BINGE_THRESHOLD: u32 = 3;

// ── HistoryAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups enriched records into output tables.
pub struct HistoryAggregator;

impl HistoryAggregator {
    /// Top titles by view count, descending, stable ties in first-encounter
    /// order, truncated to `top_n`.
    pub fn rank_by_views(
        table: &ViewingTable,
        roles: &RoleAssignment,
        top_n: usize,
    ) -> Vec<RankingEntry> {
        Self::rank_titles(table, roles, top_n, |_| 1.0)
    }

    /// Top titles by summed minutes, descending, stable ties in
    /// first-encounter order, truncated to `top_n`.
    pub fn rank_by_time(
        table: &ViewingTable,
        roles: &RoleAssignment,
        top_n: usize,
    ) -> Vec<RankingEntry> {
        Self::rank_titles(table, roles, top_n, |record| record.minutes.unwrap_or(0.0))
    }

    /// Weekday × hour minute sums. Always exactly 7 rows, Monday→Sunday,
    /// with missing combinations left at zero.
    pub fn heatmap(table: &ViewingTable) -> HeatmapTable {
        let mut heatmap = HeatmapTable::default();
        for record in &table.records {
            let (Some(weekday), Some(hour)) = (record.weekday, record.hour) else {
                continue;
            };
            if let Some(index) = WEEKDAYS.iter().position(|&name| name == weekday) {
                heatmap.add(index, hour, record.minutes.unwrap_or(0.0));
            }
        }
        heatmap
    }

    /// Minutes per `"YYYY-MM"` label, chronological. The label format sorts
    /// lexicographically in calendar order.
    pub fn monthly_trend(table: &ViewingTable) -> Vec<(String, f64)> {
        let mut months: BTreeMap<String, f64> = BTreeMap::new();
        for record in &table.records {
            if let Some(month) = &record.month {
                *months.entry(month.clone()).or_insert(0.0) += record.minutes.unwrap_or(0.0);
            }
        }
        months.into_iter().collect()
    }

    /// Minutes per calendar date, chronological.
    pub fn daily_series(table: &ViewingTable) -> Vec<(NaiveDate, f64)> {
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in &table.records {
            if let Some(date) = record.date {
                *days.entry(date).or_insert(0.0) += record.minutes.unwrap_or(0.0);
            }
        }
        days.into_iter().collect()
    }

    /// The most recent `window` date buckets of a daily series — buckets
    /// present in the data, not calendar days. Returns everything when fewer
    /// exist.
    pub fn trailing_daily(daily: &[(NaiveDate, f64)], window: usize) -> &[(NaiveDate, f64)] {
        let start = daily.len().saturating_sub(window);
        &daily[start..]
    }

    /// Same-day repeats: `(date, title)` groups with at least
    /// [`BINGE_THRESHOLD`] plays, sorted descending by count with stable
    /// ties in first-encounter order.
    pub fn detect_binges(table: &ViewingTable, roles: &RoleAssignment) -> Vec<BingeEvent> {
        let mut order: Vec<(NaiveDate, String)> = Vec::new();
        let mut counts: HashMap<(NaiveDate, String), u32> = HashMap::new();

        for record in &table.records {
            let (Some(date), Some(title)) = (record.date, record.cell(roles.title)) else {
                continue;
            };
            let key = (date, title.to_string());
            match counts.get_mut(&key) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(key.clone(), 1);
                    order.push(key);
                }
            }
        }

        let mut events: Vec<BingeEvent> = order
            .into_iter()
            .filter_map(|key| {
                let count = counts[&key];
                (count >= BINGE_THRESHOLD).then(|| BingeEvent {
                    date: key.0,
                    title: key.1,
                    count,
                })
            })
            .collect();
        events.sort_by(|a, b| b.count.cmp(&a.count));
        events
    }

    /// The five top-level scalars. `top_by_views` / `top_by_time` are the
    /// already-computed ranking tables.
    pub fn summarize(
        table: &ViewingTable,
        top_by_views: &[RankingEntry],
        top_by_time: &[RankingEntry],
    ) -> ViewingSummary {
        let total_minutes: f64 = table
            .records
            .iter()
            .map(|record| record.minutes.unwrap_or(0.0))
            .sum();

        ViewingSummary {
            total_sessions: table.len(),
            total_minutes,
            total_hours: (total_minutes / 60.0).floor() as u64,
            top_title_by_views: top_by_views.first().map(|e| e.title.clone()),
            top_title_by_time: top_by_time.first().map(|e| e.title.clone()),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic ranking driver: group by title, sum `metric` per group, sort
    /// descending (stable, so ties keep first-encounter order), truncate.
    /// Records with a missing title cell are excluded.
    fn rank_titles(
        table: &ViewingTable,
        roles: &RoleAssignment,
        top_n: usize,
        metric: impl Fn(&ViewingRecord) -> f64,
    ) -> Vec<RankingEntry> {
        let mut order: Vec<String> = Vec::new();
        let mut totals: HashMap<String, f64> = HashMap::new();

        for record in &table.records {
            let Some(title) = record.cell(roles.title) else {
                continue;
            };
            match totals.get_mut(title) {
                Some(total) => *total += metric(record),
                None => {
                    totals.insert(title.to_string(), metric(record));
                    order.push(title.to_string());
                }
            }
        }

        let mut entries: Vec<RankingEntry> = order
            .into_iter()
            .map(|title| {
                let value = totals[&title];
                RankingEntry { title, value }
            })
            .collect();
        // Vec::sort_by is stable: equal metrics keep encounter order.
        entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        entries.truncate(top_n);
        entries
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
