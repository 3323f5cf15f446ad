//! Main analysis pipeline for watchlens.
//!
//! Orchestrates role inference, record enrichment and aggregation, returning
//! a [`HistoryAnalysis`] with every table the report layer consumes plus
//! metadata about how the run's heuristics resolved.

use chrono::{NaiveDate, Utc};
use lens_core::duration::{normalize_minutes, DurationSource};
use lens_core::models::{
    BingeEvent, HeatmapTable, RankingEntry, RoleAssignment, ViewingSummary, ViewingTable,
};
use lens_core::timestamps::{enrich_timestamps, TimestampSource};
use tracing::{debug, info};

use crate::aggregator::HistoryAggregator;
use crate::columns::assign_roles;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of records processed.
    pub records_processed: usize,
    /// Header name of the assigned timestamp column, if any.
    pub timestamp_column: Option<String>,
    /// Header name of the assigned duration column, if any.
    pub duration_column: Option<String>,
    /// Header name of the title column (always resolves).
    pub title_column: String,
    /// Where the per-record timestamps came from.
    pub timestamp_source: TimestampSource,
    /// Which path produced the per-record minute values.
    pub duration_source: DurationSource,
}

/// The complete output of [`analyze_history`].
#[derive(Debug, Clone)]
pub struct HistoryAnalysis {
    /// The one-time column-role mapping applied to every record.
    pub roles: RoleAssignment,
    /// Top titles by view count.
    pub top_by_views: Vec<RankingEntry>,
    /// Top titles by summed minutes.
    pub top_by_time: Vec<RankingEntry>,
    /// Weekday × hour minute sums, Monday-first, zero-filled.
    pub heatmap: HeatmapTable,
    /// Minutes per month label, chronological.
    pub monthly: Vec<(String, f64)>,
    /// Minutes per calendar date, chronological.
    pub daily: Vec<(NaiveDate, f64)>,
    /// Same-day repeat plays, descending by count.
    pub binges: Vec<BingeEvent>,
    /// The five top-level scalars.
    pub summary: ViewingSummary,
    /// How this run's heuristics resolved.
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline over a loaded table.
///
/// 1. Infer the column-role assignment (once, for the whole table).
/// 2. Enrich records: parsed timestamps and time buckets, then minutes.
/// 3. Aggregate every output table.
///
/// Data flows strictly forward; the table is consumed and mutated only here.
pub fn analyze_history(mut table: ViewingTable, top_n: usize) -> HistoryAnalysis {
    // ── Step 1: Roles ─────────────────────────────────────────────────────────
    let roles = assign_roles(&table);
    debug!(
        "roles resolved: timestamp={:?} duration={:?} title={:?}",
        roles.timestamp.and_then(|c| table.header(c)),
        roles.duration.and_then(|c| table.header(c)),
        table.header(roles.title),
    );

    // ── Step 2: Enrichment ────────────────────────────────────────────────────
    let timestamp_source = enrich_timestamps(&mut table, &roles);
    let duration_source = normalize_minutes(&mut table, &roles);

    // ── Step 3: Aggregation ───────────────────────────────────────────────────
    let top_by_views = HistoryAggregator::rank_by_views(&table, &roles, top_n);
    let top_by_time = HistoryAggregator::rank_by_time(&table, &roles, top_n);
    let heatmap = HistoryAggregator::heatmap(&table);
    let monthly = HistoryAggregator::monthly_trend(&table);
    let daily = HistoryAggregator::daily_series(&table);
    let binges = HistoryAggregator::detect_binges(&table, &roles);
    let summary = HistoryAggregator::summarize(&table, &top_by_views, &top_by_time);

    info!(
        "analyzed {} sessions across {} titles ({} binge days)",
        summary.total_sessions,
        top_by_views.len(),
        binges.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_processed: table.len(),
        timestamp_column: roles
            .timestamp
            .and_then(|c| table.header(c))
            .map(str::to_string),
        duration_column: roles
            .duration
            .and_then(|c| table.header(c))
            .map(str::to_string),
        title_column: table
            .header(roles.title)
            .unwrap_or_default()
            .to_string(),
        timestamp_source,
        duration_source,
    };

    HistoryAnalysis {
        roles,
        top_by_views,
        top_by_time,
        heatmap,
        monthly,
        daily,
        binges,
        summary,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::models::ViewingRecord;

    fn table_with(headers: &[&str], rows: &[&[&str]]) -> ViewingTable {
        ViewingTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records: rows
                .iter()
                .map(|cells| {
                    ViewingRecord::new(cells.iter().map(|c| c.to_string()).collect())
                })
                .collect(),
        }
    }

    // ── analyze_history ───────────────────────────────────────────────────────

    #[test]
    fn test_repeated_title_start_time_export() {
        // The canonical awkward export: "Start Time" doubles as timestamp
        // (by content) and duration (by name), with no usable durations.
        let table = table_with(
            &["Title", "Start Time"],
            &[
                &["Show A", "2024-01-01 10:00"],
                &["Show A", "2024-01-01 10:05"],
                &["Show A", "2024-01-01 10:10"],
            ],
        );
        let analysis = analyze_history(table, 10);

        assert_eq!(analysis.summary.total_sessions, 3);
        assert_eq!(analysis.top_by_views[0].title, "Show A");
        assert_eq!(analysis.top_by_views[0].value, 3.0);

        assert_eq!(analysis.binges.len(), 1);
        assert_eq!(analysis.binges[0].title, "Show A");
        assert_eq!(analysis.binges[0].count, 3);
        assert_eq!(
            analysis.binges[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        // No extractable duration anywhere: 1 minute per record.
        assert_eq!(analysis.metadata.duration_source, DurationSource::UniformFallback);
        assert_eq!(analysis.summary.total_minutes, 3.0);
    }

    #[test]
    fn test_fallback_minutes_equal_sessions() {
        let table = table_with(
            &["Title", "Date"],
            &[
                &["Show A", "2024-01-01"],
                &["Show B", "2024-01-02"],
                &["Show C", "2024-01-03"],
                &["Show D", "2024-01-04"],
            ],
        );
        let analysis = analyze_history(table, 10);

        assert_eq!(
            analysis.summary.total_minutes,
            analysis.summary.total_sessions as f64
        );
    }

    #[test]
    fn test_full_pipeline_with_durations() {
        let table = table_with(
            &["Show", "Date", "Duration"],
            &[
                &["Alpha", "2024-01-15 20:00:00", "60"],
                &["Alpha", "2024-01-16 21:00:00", "45"],
                &["Beta", "2024-02-01 09:30:00", "120"],
            ],
        );
        let analysis = analyze_history(table, 10);

        assert_eq!(analysis.metadata.timestamp_column.as_deref(), Some("Date"));
        assert_eq!(analysis.metadata.duration_column.as_deref(), Some("Duration"));
        assert_eq!(analysis.metadata.title_column, "Show");
        assert_eq!(analysis.metadata.duration_source, DurationSource::NumericColumn);
        assert_eq!(analysis.metadata.timestamp_source, TimestampSource::Column);

        assert_eq!(analysis.summary.total_minutes, 225.0);
        assert_eq!(analysis.summary.total_hours, 3);
        assert_eq!(analysis.top_by_time[0].title, "Beta");
        assert_eq!(analysis.monthly.len(), 2);
        assert_eq!(analysis.daily.len(), 3);
        assert!(analysis.binges.is_empty());

        // 2024-01-15 was a Monday.
        assert_eq!(analysis.heatmap.get(0, 20), 60.0);
    }

    #[test]
    fn test_no_timestamp_column_synthesizes_axis() {
        let table = table_with(
            &["Title", "Note"],
            &[&["Show A", "x"], &["Show B", "y"], &["Show C", "z"]],
        );
        let analysis = analyze_history(table, 10);

        assert_eq!(
            analysis.metadata.timestamp_source,
            TimestampSource::Synthesized
        );
        // One ordinal day per row keeps daily buckets distinct.
        assert_eq!(analysis.daily.len(), 3);
    }

    #[test]
    fn test_empty_table() {
        let table = table_with(&["Title", "Date"], &[]);
        let analysis = analyze_history(table, 10);

        assert_eq!(analysis.summary.total_sessions, 0);
        assert!(analysis.top_by_views.is_empty());
        assert!(analysis.binges.is_empty());
        assert!(analysis.monthly.is_empty());
        assert!(analysis.summary.top_title_by_views.is_none());
    }

    #[test]
    fn test_metadata_generated_at_populated() {
        let table = table_with(&["Title"], &[&["Show A"]]);
        let analysis = analyze_history(table, 10);
        assert!(!analysis.metadata.generated_at.is_empty());
        assert_eq!(analysis.metadata.records_processed, 1);
    }
}
