mod bootstrap;

use anyhow::Result;
use clap::Parser;
use lens_core::error::LensError;
use lens_core::formatting::{format_number, format_time};
use lens_core::settings::Settings;
use lens_data::analysis::analyze_history;
use lens_data::reader::load_history;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("watchlens v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "input: {}, output: {}, top-n: {}",
        settings.input.display(),
        settings.output_dir.display(),
        settings.top_n
    );

    // A missing export is a user-guidance situation, not a crash.
    let table = match load_history(&settings.input) {
        Ok(table) => table,
        Err(LensError::MissingInput { path }) => {
            println!("Viewing-history file not found: {}", path.display());
            println!(
                "Put your viewing-history export CSV in the working folder and name it '{}',",
                path.display()
            );
            println!("or point at it explicitly with --input <path>.");
            return Ok(());
        }
        Err(other) => return Err(other.into()),
    };

    println!("Columns found: {}", table.headers.join(", "));

    let analysis = analyze_history(table, settings.top_n as usize);

    bootstrap::ensure_output_dir(&settings.output_dir)?;
    let written = lens_report::emit_all(&settings.output_dir, &analysis, !settings.no_charts)?;

    let summary = &analysis.summary;
    println!();
    println!("{}", "=".repeat(50));
    println!("VIEWING STATISTICS");
    println!("{}", "=".repeat(50));
    println!(
        "Total sessions: {}",
        format_number(summary.total_sessions as f64, 0)
    );
    println!("Total minutes: {}", format_number(summary.total_minutes, 0));
    println!(
        "Total hours: {} ({})",
        format_number(summary.total_hours as f64, 0),
        format_time(summary.total_minutes)
    );
    if let Some(title) = &summary.top_title_by_views {
        println!("Most watched: {}", title);
    }
    if let Some(title) = &summary.top_title_by_time {
        println!("Most time invested: {}", title);
    }
    println!("{}", "=".repeat(50));
    println!();

    println!("Outputs written to {}", settings.output_dir.display());
    println!("Generated files:");
    for path in &written {
        if let Some(name) = path.file_name() {
            println!("   - {}", name.to_string_lossy());
        }
    }

    Ok(())
}
