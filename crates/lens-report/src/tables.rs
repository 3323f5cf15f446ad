//! Flat-file table emission.
//!
//! Writes the machine-readable outputs: two ranking tables, the binge list
//! and the summary scalars, all as small CSV files that overwrite any
//! previous run.

use std::path::{Path, PathBuf};

use lens_core::error::Result;
use lens_core::models::{BingeEvent, RankingEntry, ViewingSummary};
use lens_data::analysis::HistoryAnalysis;
use tracing::debug;

pub const TOP_BY_VIEWS_FILE: &str = "top_by_views.csv";
pub const TOP_BY_TIME_FILE: &str = "top_by_time.csv";
pub const BINGE_FILE: &str = "binge_sessions.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Write all four flat tables for an analysis. Returns the paths written.
pub fn emit_tables(output_dir: &Path, analysis: &HistoryAnalysis) -> Result<Vec<PathBuf>> {
    let views_path = output_dir.join(TOP_BY_VIEWS_FILE);
    write_ranking(&views_path, "views", &analysis.top_by_views, 0)?;

    let time_path = output_dir.join(TOP_BY_TIME_FILE);
    write_ranking(&time_path, "minutes", &analysis.top_by_time, 1)?;

    let binge_path = output_dir.join(BINGE_FILE);
    write_binges(&binge_path, &analysis.binges)?;

    let summary_path = output_dir.join(SUMMARY_FILE);
    write_summary(&summary_path, &analysis.summary)?;

    debug!("flat tables written to {}", output_dir.display());
    Ok(vec![views_path, time_path, binge_path, summary_path])
}

/// Write one ranking table as `title,<value_header>` rows.
pub fn write_ranking(
    path: &Path,
    value_header: &str,
    entries: &[RankingEntry],
    decimals: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["title", value_header])?;
    for entry in entries {
        writer.write_record([
            entry.title.as_str(),
            &format!("{:.prec$}", entry.value, prec = decimals),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write binge events as `date,title,count` rows (already sorted descending
/// by count).
pub fn write_binges(path: &Path, events: &[BingeEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "title", "count"])?;
    for event in events {
        writer.write_record([
            &event.date.format("%Y-%m-%d").to_string(),
            event.title.as_str(),
            &event.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the five summary scalars as `metric,value` rows.
pub fn write_summary(path: &Path, summary: &ViewingSummary) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["metric", "value"])?;
    writer.write_record(["total_sessions", &summary.total_sessions.to_string()])?;
    writer.write_record(["total_minutes", &format!("{:.0}", summary.total_minutes)])?;
    writer.write_record(["total_hours", &summary.total_hours.to_string()])?;
    writer.write_record([
        "top_title_by_views",
        summary.top_title_by_views.as_deref().unwrap_or(""),
    ])?;
    writer.write_record([
        "top_title_by_time",
        summary.top_title_by_time.as_deref().unwrap_or(""),
    ])?;
    writer.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
