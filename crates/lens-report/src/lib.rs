//! Report emission layer for watchlens.
//!
//! Consumes a finished [`HistoryAnalysis`](lens_data::analysis::HistoryAnalysis)
//! and turns it into artifacts: flat CSV tables and rendered PNG charts.
//! Nothing here feeds back into the pipeline; this layer is a pure sink.

pub mod charts;
pub mod tables;

use std::path::{Path, PathBuf};

use lens_core::error::Result;
use lens_data::analysis::HistoryAnalysis;
use tracing::info;

/// Write every artifact for an analysis into `output_dir`, overwriting any
/// previous run. Returns the paths written, in emission order.
///
/// `with_charts = false` limits the run to the flat tables.
pub fn emit_all(
    output_dir: &Path,
    analysis: &HistoryAnalysis,
    with_charts: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = tables::emit_tables(output_dir, analysis)?;
    if with_charts {
        written.extend(charts::emit_charts(output_dir, analysis)?);
    }
    info!("wrote {} artifacts to {}", written.len(), output_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::models::{ViewingRecord, ViewingTable};
    use lens_data::analysis::analyze_history;
    use tempfile::TempDir;

    fn sample_analysis() -> HistoryAnalysis {
        let table = ViewingTable {
            headers: vec!["Title".to_string(), "Date".to_string(), "Duration".to_string()],
            records: vec![
                ViewingRecord::new(vec![
                    "Show A".to_string(),
                    "2024-01-15 20:00:00".to_string(),
                    "60".to_string(),
                ]),
                ViewingRecord::new(vec![
                    "Show A".to_string(),
                    "2024-01-15 21:00:00".to_string(),
                    "45".to_string(),
                ]),
                ViewingRecord::new(vec![
                    "Show A".to_string(),
                    "2024-01-15 22:00:00".to_string(),
                    "30".to_string(),
                ]),
                ViewingRecord::new(vec![
                    "Show B".to_string(),
                    "2024-02-01 09:00:00".to_string(),
                    "120".to_string(),
                ]),
            ],
        };
        analyze_history(table, 10)
    }

    #[test]
    fn test_emit_all_tables_only() {
        let dir = TempDir::new().unwrap();
        let analysis = sample_analysis();

        let written = emit_all(dir.path(), &analysis, false).unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "{} should exist", path.display());
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_emit_all_with_charts() {
        let dir = TempDir::new().unwrap();
        let analysis = sample_analysis();

        let written = emit_all(dir.path(), &analysis, true).unwrap();

        // 4 flat tables + 5 charts.
        assert_eq!(written.len(), 9);
        assert!(written
            .iter()
            .any(|p| p.file_name().unwrap() == "summary_dashboard.png"));
        for path in &written {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_csv_in_flat_tables_out() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        let input = dir.path().join("history.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        write!(
            file,
            "Title,Date,Duration\n\
             Show A,2024-01-15 20:00:00,60\n\
             Show A,2024-01-15 21:00:00,45\n\
             Show B,2024-02-01 09:00:00,120\n"
        )
        .unwrap();

        let table = lens_data::reader::load_history(&input).unwrap();
        let analysis = analyze_history(table, 10);
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        emit_all(&out, &analysis, false).unwrap();

        for name in [
            "top_by_views.csv",
            "top_by_time.csv",
            "binge_sessions.csv",
            "summary.csv",
        ] {
            assert!(out.join(name).exists(), "{} should exist", name);
        }
        let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
        assert!(summary.contains("total_sessions,3"));
        assert!(summary.contains("total_minutes,225"));
    }

    #[test]
    fn test_emit_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        let analysis = sample_analysis();

        emit_all(dir.path(), &analysis, false).unwrap();
        let written = emit_all(dir.path(), &analysis, false).unwrap();

        assert_eq!(written.len(), 4);
    }
}
