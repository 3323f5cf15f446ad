//! CSV loading for viewing-history exports.
//!
//! Reads the whole export into a [`ViewingTable`] in one pass. Column names
//! are whitespace-trimmed, ragged rows are padded with missing cells and rows
//! the CSV layer cannot decode are skipped with a warning rather than
//! aborting the run.

use std::path::Path;

use lens_core::error::{LensError, Result};
use lens_core::models::{ViewingRecord, ViewingTable};
use tracing::{debug, warn};

/// Load a viewing-history CSV into memory.
///
/// The file's absence is reported as [`LensError::MissingInput`] so the
/// caller can print guidance instead of a stack trace. Each record's cell
/// vector is padded or truncated to the header width.
pub fn load_history(path: &Path) -> Result<ViewingTable> {
    if !path.exists() {
        return Err(LensError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records: Vec<ViewingRecord> = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping undecodable row in {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        let cells: Vec<String> = (0..headers.len())
            .map(|i| row.get(i).unwrap_or("").to_string())
            .collect();
        records.push(ViewingRecord::new(cells));
    }

    debug!(
        "loaded {} records ({} skipped) from {}",
        records.len(),
        skipped,
        path.display()
    );

    Ok(ViewingTable { headers, records })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
