//! Duration normalization: raw cell values → minutes.
//!
//! Durations show up in exports as plain numbers (`"45"`), compound tokens
//! (`"1h 30m"`) or prose (`"45 min"`). Normalization is an explicit two-stage
//! strategy: attempt numeric coercion over the whole column first, and only
//! when that fails for *every* record discard it and re-run the textual
//! extractor — never a silent mix of the two encodings.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{RoleAssignment, ViewingTable};

// ── Textual extraction ────────────────────────────────────────────────────────

/// Extract a minute count from free-form text.
///
/// Searches case-insensitively for an hours token (`"2h"`) and a minutes
/// token (`"30m"`) and returns `hours * 60 + minutes` when either is found
/// and the sum is positive. Failing that, a standalone `"45 min"` number is
/// taken as minutes. Anything else yields `None`.
pub fn extract_minutes_from_text(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let hours_re = Regex::new(r"(?i)(\d+)\s*h").expect("regex is valid");
    let minutes_re = Regex::new(r"(?i)(\d+)\s*m").expect("regex is valid");

    let mut minutes = 0.0_f64;
    if let Some(cap) = hours_re.captures(raw) {
        if let Ok(hours) = cap[1].parse::<f64>() {
            minutes += hours * 60.0;
        }
    }
    if let Some(cap) = minutes_re.captures(raw) {
        if let Ok(mins) = cap[1].parse::<f64>() {
            minutes += mins;
        }
    }
    if minutes > 0.0 {
        return Some(minutes);
    }

    let standalone_re = Regex::new(r"(?i)(\d{1,4})\s*min").expect("regex is valid");
    if let Some(cap) = standalone_re.captures(raw) {
        if let Ok(mins) = cap[1].parse::<f64>() {
            return Some(mins);
        }
    }

    None
}

/// Coerce a raw cell to a non-negative finite minute value.
fn coerce_numeric(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// How the per-record minute values were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// Numeric coercion of the assigned duration column.
    NumericColumn,
    /// Textual extraction from the assigned duration column (numeric
    /// coercion failed table-wide).
    TextualColumn,
    /// Per-record extraction scanned across all non-role columns.
    ScannedColumns,
    /// Every record lacked duration data; a uniform 1 minute was substituted
    /// so count-based aggregations stay meaningful.
    UniformFallback,
}

/// Fill every record's `minutes` field and report which path produced them.
///
/// * With an assigned duration column: stage A coerces each cell
///   numerically; if stage A yields zero non-null values across the table,
///   it is discarded wholesale and stage B applies
///   [`extract_minutes_from_text`] to each cell instead.
/// * Without one: every column other than the timestamp and title columns
///   is scanned in header order, and per record the first successful
///   extraction wins.
/// * If every record is still null after all of the above, a uniform 1.0 is
///   substituted table-wide — a degraded mode, not an error.
///
/// Re-running on an already-normalized table is a no-op: the derivation only
/// reads raw cells, deterministically.
pub fn normalize_minutes(table: &mut ViewingTable, roles: &RoleAssignment) -> DurationSource {
    let mut source = match roles.duration {
        Some(column) => {
            let numeric: Vec<Option<f64>> = table
                .records
                .iter()
                .map(|record| record.cell(column).and_then(coerce_numeric))
                .collect();

            if numeric.iter().any(|v| v.is_some()) {
                for (record, minutes) in table.records.iter_mut().zip(numeric) {
                    record.minutes = minutes;
                }
                DurationSource::NumericColumn
            } else {
                // Numeric coercion failed for every record: the column is
                // textual, not a partially-numeric mix.
                debug!(
                    "duration column {:?} is non-numeric; using textual extraction",
                    table.headers.get(column)
                );
                for record in table.records.iter_mut() {
                    record.minutes = record.cell(column).and_then(extract_minutes_from_text);
                }
                DurationSource::TextualColumn
            }
        }
        None => {
            let candidates: Vec<usize> = (0..table.column_count())
                .filter(|&c| !roles.is_timestamp(c) && !roles.is_title(c))
                .collect();
            debug!(
                "no duration column found; scanning {} candidate columns",
                candidates.len()
            );
            for record in table.records.iter_mut() {
                record.minutes = candidates
                    .iter()
                    .find_map(|&c| record.cell(c).and_then(extract_minutes_from_text));
            }
            DurationSource::ScannedColumns
        }
    };

    if !table.is_empty() && table.records.iter().all(|r| r.minutes.is_none()) {
        warn!("no duration data anywhere in the table; substituting 1 minute per record");
        for record in table.records.iter_mut() {
            record.minutes = Some(1.0);
        }
        source = DurationSource::UniformFallback;
    }

    source
}

// ── Tests ─────────────────────────────────────────────────────────────────────
