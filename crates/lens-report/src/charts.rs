//! Chart rendering via plotters.
//!
//! Five PNG artifacts, all drawn on a dark theme with the streaming-red
//! accent the original exports are associated with. Charts are pure sinks:
//! they consume the aggregation tables and carry no logic of their own
//! beyond layout and color scaling.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lens_core::error::{LensError, Result};
use lens_core::formatting::{format_number, format_time};
use lens_core::models::{HeatmapTable, RankingEntry, WEEKDAYS};
use lens_data::aggregator::HistoryAggregator;
use lens_data::analysis::HistoryAnalysis;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

pub const TOP_BY_VIEWS_CHART: &str = "top_by_views.png";
pub const TOP_BY_TIME_CHART: &str = "top_by_time.png";
pub const HEATMAP_CHART: &str = "heatmap_weekday_hour.png";
pub const MONTHLY_TREND_CHART: &str = "monthly_trend.png";
pub const DASHBOARD_CHART: &str = "summary_dashboard.png";

/// How many daily buckets the dashboard's trailing panel shows.
const DASHBOARD_WINDOW: usize = 30;

// ── Palette ───────────────────────────────────────────────────────────────────

const BACKGROUND: RGBColor = RGBColor(26, 26, 26);
const ACCENT_RED: RGBColor = RGBColor(229, 9, 20);
const ACCENT_ORANGE: RGBColor = RGBColor(255, 107, 53);
const TEXT_COLOR: RGBColor = RGBColor(224, 224, 224);
const GRID_COLOR: RGBColor = RGBColor(90, 90, 90);

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Render all five charts for an analysis. Returns the paths written.
pub fn emit_charts(output_dir: &Path, analysis: &HistoryAnalysis) -> Result<Vec<PathBuf>> {
    let views_path = output_dir.join(TOP_BY_VIEWS_CHART);
    render_ranking_chart(
        &views_path,
        "Top 10 Most Watched Titles",
        "Number of Views",
        &analysis.top_by_views,
        ACCENT_RED,
        0,
    )?;

    let time_path = output_dir.join(TOP_BY_TIME_CHART);
    render_ranking_chart(
        &time_path,
        "Top 10 Shows by Watch Time",
        "Minutes Watched",
        &analysis.top_by_time,
        ACCENT_ORANGE,
        0,
    )?;

    let heatmap_path = output_dir.join(HEATMAP_CHART);
    render_heatmap(&heatmap_path, &analysis.heatmap)?;

    let trend_path = output_dir.join(MONTHLY_TREND_CHART);
    render_monthly_trend(&trend_path, &analysis.monthly)?;

    let dashboard_path = output_dir.join(DASHBOARD_CHART);
    render_dashboard(&dashboard_path, analysis)?;

    debug!("charts written to {}", output_dir.display());
    Ok(vec![
        views_path,
        time_path,
        heatmap_path,
        trend_path,
        dashboard_path,
    ])
}

/// Horizontal bar chart of a ranking table.
pub fn render_ranking_chart(
    path: &Path,
    caption: &str,
    x_desc: &str,
    entries: &[RankingEntry],
    color: RGBColor,
    decimals: u32,
) -> Result<()> {
    let draw = || -> DrawResult {
        let root = BitMapBackend::new(path, (1200, 700)).into_drawing_area();
        root.fill(&BACKGROUND)?;
        draw_bars(&root, caption, x_desc, entries, color, decimals)?;
        root.present()?;
        Ok(())
    };
    draw().map_err(|e| LensError::Render(e.to_string()))
}

/// Weekday × hour heatmap: 7 rows Monday→Sunday, 24 hour columns, cell
/// intensity scaled to the largest bucket.
pub fn render_heatmap(path: &Path, heatmap: &HeatmapTable) -> Result<()> {
    let draw = || -> DrawResult {
        let root = BitMapBackend::new(path, (1400, 600)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Watch Time Heatmap (Weekday vs Hour)",
                ("sans-serif", 28).into_font().color(&TEXT_COLOR),
            )
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(110)
            .build_cartesian_2d(0i32..24, 0i32..7)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(24)
            .y_labels(7)
            .x_desc("Hour of Day")
            .y_desc("Weekday")
            .axis_style(GRID_COLOR)
            .label_style(("sans-serif", 14).into_font().color(&TEXT_COLOR))
            .x_label_formatter(&|hour| hour.to_string())
            .y_label_formatter(&|row| {
                // Row 6 is drawn at the top; keep Monday first visually.
                WEEKDAYS
                    .get((6 - row) as usize)
                    .map(|name| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        let max = heatmap.max_value();
        for (weekday_index, (_, row)) in heatmap.rows().enumerate() {
            let y = 6 - weekday_index as i32;
            for (hour, &minutes) in row.iter().enumerate() {
                let x = hour as i32;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1, y + 1)],
                    heat_color(minutes, max).filled(),
                )))?;
            }
        }

        root.present()?;
        Ok(())
    };
    draw().map_err(|e| LensError::Render(e.to_string()))
}

/// Monthly watch-time trend: line, filled area and per-point labels.
pub fn render_monthly_trend(path: &Path, monthly: &[(String, f64)]) -> Result<()> {
    let draw = || -> DrawResult {
        let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        if monthly.is_empty() {
            root.present()?;
            return Ok(());
        }

        let max = monthly.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0);
        let count = monthly.len();

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Monthly Watch Time Trend",
                ("sans-serif", 28).into_font().color(&TEXT_COLOR),
            )
            .margin(16)
            .x_label_area_size(64)
            .y_label_area_size(72)
            .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), 0f64..max * 1.2)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_desc("Month")
            .y_desc("Minutes Watched")
            .axis_style(GRID_COLOR)
            .light_line_style(GRID_COLOR.mix(0.15))
            .label_style(("sans-serif", 14).into_font().color(&TEXT_COLOR))
            .x_label_formatter(&|x| {
                let index = x.round();
                if (x - index).abs() < 1e-6 && index >= 0.0 {
                    monthly
                        .get(index as usize)
                        .map(|(label, _)| label.clone())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .draw()?;

        let points: Vec<(f64, f64)> = monthly
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i as f64, *v))
            .collect();

        chart.draw_series(AreaSeries::new(points.clone(), 0.0, ACCENT_RED.mix(0.25)))?;
        chart.draw_series(LineSeries::new(
            points.clone(),
            ShapeStyle::from(&ACCENT_RED).stroke_width(3),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, ACCENT_RED.filled())),
        )?;
        chart.draw_series(points.iter().map(|&(x, y)| {
            Text::new(
                format_number(y, 0),
                (x, y + max * 0.04),
                ("sans-serif", 13).into_font().color(&TEXT_COLOR),
            )
        }))?;

        root.present()?;
        Ok(())
    };
    draw().map_err(|e| LensError::Render(e.to_string()))
}

/// Composite dashboard: summary text panel, top-5 breakdowns and the
/// trailing daily panel.
pub fn render_dashboard(path: &Path, analysis: &HistoryAnalysis) -> Result<()> {
    let draw = || -> DrawResult {
        let root = BitMapBackend::new(path, (1400, 1000)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let (header, body) = root.split_vertically(230);
        let (middle, bottom) = body.split_vertically(420);
        let (left, right) = middle.split_horizontally(700);

        draw_summary_panel(&header, analysis)?;

        let top5_views: Vec<RankingEntry> =
            analysis.top_by_views.iter().take(5).cloned().collect();
        draw_bars(&left, "Top 5 by Views", "Views", &top5_views, ACCENT_RED, 0)?;

        let top5_time: Vec<RankingEntry> =
            analysis.top_by_time.iter().take(5).cloned().collect();
        draw_bars(
            &right,
            "Top 5 by Watch Time",
            "Minutes",
            &top5_time,
            ACCENT_ORANGE,
            0,
        )?;

        let window = HistoryAggregator::trailing_daily(&analysis.daily, DASHBOARD_WINDOW);
        draw_daily_panel(&bottom, window)?;

        root.present()?;
        Ok(())
    };
    draw().map_err(|e| LensError::Render(e.to_string()))
}

// ── Internal drawing helpers ──────────────────────────────────────────────────

/// Horizontal bars with value labels, highest at the top.
fn draw_bars(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    x_desc: &str,
    entries: &[RankingEntry],
    color: RGBColor,
    decimals: u32,
) -> DrawResult {
    if entries.is_empty() {
        return Ok(());
    }

    let max = entries.iter().map(|e| e.value).fold(0.0, f64::max).max(1.0);
    let count = entries.len() as i32;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 26).into_font().color(&TEXT_COLOR))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(230)
        .build_cartesian_2d(0f64..max * 1.15, 0i32..count)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(entries.len())
        .x_desc(x_desc)
        .axis_style(GRID_COLOR)
        .light_line_style(GRID_COLOR.mix(0.15))
        .label_style(("sans-serif", 14).into_font().color(&TEXT_COLOR))
        .y_label_formatter(&|y| {
            // Entry 0 occupies the topmost band.
            entries
                .get((count - 1 - y) as usize)
                .map(|e| truncate_title(&e.title))
                .unwrap_or_default()
        })
        .draw()?;

    for (index, entry) in entries.iter().enumerate() {
        let y = count - 1 - index as i32;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y), (entry.value, y + 1)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format_number(entry.value, decimals),
            (entry.value + max * 0.015, y),
            ("sans-serif", 15).into_font().color(&TEXT_COLOR),
        )))?;
    }

    Ok(())
}

/// The dashboard's headline numbers, drawn as plain text lines.
fn draw_summary_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    analysis: &HistoryAnalysis,
) -> DrawResult {
    let summary = &analysis.summary;

    let headline = "YOUR VIEWING REPORT".to_string();
    let totals = format!(
        "Total Sessions: {}   |   Total Hours: {}   |   Total Minutes: {}",
        format_number(summary.total_sessions as f64, 0),
        format_number(summary.total_hours as f64, 0),
        format_number(summary.total_minutes, 0),
    );
    let most_watched = match analysis.top_by_views.first() {
        Some(entry) => format!(
            "Most Watched: {} ({} views)",
            entry.title,
            format_number(entry.value, 0)
        ),
        None => "Most Watched: N/A".to_string(),
    };
    let most_time = match analysis.top_by_time.first() {
        Some(entry) => format!(
            "Highest Time Investment: {} ({})",
            entry.title,
            format_time(entry.value)
        ),
        None => "Highest Time Investment: N/A".to_string(),
    };

    let title_style = ("sans-serif", 32).into_font().color(&ACCENT_RED);
    let line_style = ("sans-serif", 20).into_font().color(&TEXT_COLOR);

    area.draw(&Text::new(headline, (40, 40), title_style))?;
    area.draw(&Text::new(totals, (40, 100), line_style.clone()))?;
    area.draw(&Text::new(most_watched, (40, 140), line_style.clone()))?;
    area.draw(&Text::new(most_time, (40, 175), line_style))?;

    Ok(())
}

/// Bar panel of the most recent daily buckets.
fn draw_daily_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    daily: &[(NaiveDate, f64)],
) -> DrawResult {
    if daily.is_empty() {
        return Ok(());
    }

    let max = daily.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0);
    let count = daily.len() as i32;

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Last {} Days Watch Time", daily.len()),
            ("sans-serif", 26).into_font().color(&TEXT_COLOR),
        )
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(0i32..count, 0f64..max * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(daily.len().min(10))
        .x_desc("Day")
        .y_desc("Minutes")
        .axis_style(GRID_COLOR)
        .light_line_style(GRID_COLOR.mix(0.15))
        .label_style(("sans-serif", 13).into_font().color(&TEXT_COLOR))
        .x_label_formatter(&|x| {
            daily
                .get(*x as usize)
                .map(|(date, _)| date.format("%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    for (index, &(_, minutes)) in daily.iter().enumerate() {
        let x = index as i32;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x, 0.0), (x + 1, minutes)],
            ACCENT_RED.mix(0.7).filled(),
        )))?;
    }

    Ok(())
}

/// Linear blend from the background towards the accent red; zero stays dark.
fn heat_color(value: f64, max: f64) -> RGBColor {
    let t = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let blend = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    RGBColor(
        blend(BACKGROUND.0, ACCENT_RED.0),
        blend(BACKGROUND.1, ACCENT_RED.1),
        blend(BACKGROUND.2, ACCENT_RED.2),
    )
}

/// Keep y-axis labels readable for very long titles.
fn truncate_title(title: &str) -> String {
    const MAX_CHARS: usize = 28;
    if title.chars().count() <= MAX_CHARS {
        title.to_string()
    } else {
        let cut: String = title.chars().take(MAX_CHARS - 1).collect();
        format!("{}…", cut)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::models::{ViewingRecord, ViewingTable};
    use lens_data::analysis::analyze_history;
    use tempfile::TempDir;

    fn sample_analysis() -> HistoryAnalysis {
        let mut records = Vec::new();
        for day in 1..=5 {
            for title in ["Show A", "Show B"] {
                records.push(ViewingRecord::new(vec![
                    title.to_string(),
                    format!("2024-01-{:02} 20:00:00", day),
                    "45".to_string(),
                ]));
            }
        }
        let table = ViewingTable {
            headers: vec![
                "Title".to_string(),
                "Date".to_string(),
                "Duration".to_string(),
            ],
            records,
        };
        analyze_history(table, 10)
    }

    #[test]
    fn test_emit_charts_writes_five_files() {
        let dir = TempDir::new().unwrap();
        let analysis = sample_analysis();

        let written = emit_charts(dir.path(), &analysis).unwrap();

        assert_eq!(written.len(), 5);
        for path in &written {
            assert!(path.exists(), "{} should exist", path.display());
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_render_monthly_trend_empty_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.png");

        render_monthly_trend(&path, &[]).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_heat_color_scales() {
        assert_eq!(heat_color(0.0, 100.0), BACKGROUND);
        assert_eq!(heat_color(100.0, 100.0), ACCENT_RED);
        // Zero max never divides by zero.
        assert_eq!(heat_color(0.0, 0.0), BACKGROUND);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short"), "Short");
        let long = "A Very Long Title That Keeps Going And Going Forever";
        let truncated = truncate_title(long);
        assert!(truncated.chars().count() <= 28);
        assert!(truncated.ends_with('…'));
    }
}
