use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Viewing-history analytics for streaming-service exports.
///
/// Defaults mirror the conventional export layout: the CSV is expected in the
/// working directory under its stock name and artifacts land in a fixed
/// output folder. The struct is built once at startup and passed into the
/// pipeline — nothing reads global state.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "watchlens",
    about = "Descriptive analytics for streaming viewing-history exports",
    version
)]
pub struct Settings {
    /// Path to the viewing-history CSV export
    #[arg(long, default_value = "NetflixViewingHistory.csv")]
    pub input: PathBuf,

    /// Directory for generated tables and charts (created if absent)
    #[arg(long, default_value = "netflix_output")]
    pub output_dir: PathBuf,

    /// Number of titles kept in each ranking table
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top_n: u32,

    /// Skip chart rendering and emit only the flat tables
    #[arg(long)]
    pub no_charts: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}
