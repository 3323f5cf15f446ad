//! Timestamp parsing and temporal decomposition.
//!
//! Parses the variety of timestamp formats found in viewing-history exports
//! and derives the per-record time buckets (date, weekday, hour, month) that
//! the aggregator consumes. Unparseable values degrade to `None`; they are
//! never fatal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono::Datelike as _;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{RoleAssignment, ViewingTable, WEEKDAYS};

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Attempt to parse a raw cell value into a UTC [`DateTime`].
///
/// Handles RFC 3339 / ISO 8601 (including the `Z` suffix), RFC 2822 and a
/// series of common export patterns, both datetime and date-only.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive patterns seen across streaming exports. Ambiguous slash dates
    // resolve month-first; day-first is only a fallback for dates that
    // cannot be month-first (e.g. "25/12/2024").
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%y %H:%M",
        "%Y-%m-%d",
        // Two-digit years must be tried before %Y, which would otherwise
        // accept "24" as the year 24 AD.
        "%m/%d/%y",
        "%m/%d/%Y",
        "%d/%m/%Y",
    ];

    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
        // Date-only patterns use NaiveDate.
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    debug!("could not parse timestamp \"{}\"", s);
    None
}

/// Synthesize a timestamp from a record's row position.
///
/// Used when no timestamp column could be found: one day per row starting at
/// the Unix epoch, giving the pipeline an ordering signal to bucket on at the
/// cost of real calendar semantics.
pub fn synthesize_timestamp(row_index: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(row_index as i64)
}

// ── Decomposition ─────────────────────────────────────────────────────────────

/// The time buckets derived from one parsed timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalParts {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub hour: u32,
    pub month: String,
}

/// Derive calendar date, Monday-first weekday name, hour of day and a
/// `"YYYY-MM"` month label from a timestamp.
pub fn decompose(dt: DateTime<Utc>) -> TemporalParts {
    TemporalParts {
        date: dt.date_naive(),
        weekday: WEEKDAYS[dt.weekday().num_days_from_monday() as usize],
        hour: dt.hour(),
        month: dt.format("%Y-%m").to_string(),
    }
}

// ── Enrichment ────────────────────────────────────────────────────────────────

/// Where the per-record timestamps came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Parsed from the assigned timestamp column.
    Column,
    /// Synthesized from row positions because no column qualified.
    Synthesized,
}

/// Fill every record's `parsed_timestamp` and derived time buckets.
///
/// With an assigned timestamp column, each raw value is parsed individually;
/// a record whose value does not parse keeps `None` in all derived fields and
/// survives. Without one, timestamps are synthesized from row order.
pub fn enrich_timestamps(table: &mut ViewingTable, roles: &RoleAssignment) -> TimestampSource {
    let source = match roles.timestamp {
        Some(column) => {
            let mut failed = 0usize;
            for record in table.records.iter_mut() {
                record.parsed_timestamp = record.cell(column).and_then(parse_timestamp);
                if record.parsed_timestamp.is_none() {
                    failed += 1;
                }
            }
            if failed > 0 {
                warn!(
                    "{} of {} records had unparseable timestamps",
                    failed,
                    table.len()
                );
            }
            TimestampSource::Column
        }
        None => {
            warn!("no timestamp column found; synthesizing timestamps from row order");
            for (index, record) in table.records.iter_mut().enumerate() {
                record.parsed_timestamp = Some(synthesize_timestamp(index));
            }
            TimestampSource::Synthesized
        }
    };

    for record in table.records.iter_mut() {
        if let Some(ts) = record.parsed_timestamp {
            let parts = decompose(ts);
            record.date = Some(parts.date);
            record.weekday = Some(parts.weekday);
            record.hour = Some(parts.hour);
            record.month = Some(parts.month);
        }
    }

    source
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewingRecord;

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

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_rfc3339_z_suffix() {
        let dt = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_space_separated_without_seconds() {
        let dt = parse_timestamp("2024-01-01 10:05").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 5);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2024-03-09").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_ambiguous_slash_date_month_first() {
        // Month-first wins for ambiguous slash dates.
        let dt = parse_timestamp("05/03/2024").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }

    #[test]
    fn test_parse_day_first_when_month_first_impossible() {
        let dt = parse_timestamp("25/12/2024").unwrap();
        assert_eq!(
            dt.date_naive(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
    }

    #[test]
    fn test_parse_two_digit_year() {
        let dt = parse_timestamp("3/14/24").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_empty_and_garbage_return_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("Show A").is_none());
    }

    // ── synthesize_timestamp ──────────────────────────────────────────────────

    #[test]
    fn test_synthesize_preserves_order() {
        assert!(synthesize_timestamp(0) < synthesize_timestamp(1));
        assert!(synthesize_timestamp(1) < synthesize_timestamp(100));
    }

    #[test]
    fn test_synthesize_distinct_dates() {
        let a = synthesize_timestamp(0).date_naive();
        let b = synthesize_timestamp(1).date_naive();
        assert_ne!(a, b);
    }

    // ── decompose ─────────────────────────────────────────────────────────────

    #[test]
    fn test_decompose_fields() {
        // 2024-01-15 was a Monday.
        let dt = parse_timestamp("2024-01-15T22:45:00Z").unwrap();
        let parts = decompose(dt);
        assert_eq!(parts.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(parts.weekday, "Monday");
        assert_eq!(parts.hour, 22);
        assert_eq!(parts.month, "2024-01");
    }

    #[test]
    fn test_decompose_sunday() {
        // 2024-01-21 was a Sunday.
        let dt = parse_timestamp("2024-01-21 09:00:00").unwrap();
        assert_eq!(decompose(dt).weekday, "Sunday");
    }

    // ── enrich_timestamps ─────────────────────────────────────────────────────

    #[test]
    fn test_enrich_from_column() {
        let mut table = table_with(
            &["Title", "Date"],
            &[&["Show A", "2024-01-15 10:00:00"], &["Show B", "garbage"]],
        );
        let roles = RoleAssignment {
            timestamp: Some(1),
            duration: None,
            title: 0,
        };

        let source = enrich_timestamps(&mut table, &roles);

        assert_eq!(source, TimestampSource::Column);
        assert!(table.records[0].parsed_timestamp.is_some());
        assert_eq!(table.records[0].weekday, Some("Monday"));
        assert_eq!(table.records[0].month.as_deref(), Some("2024-01"));
        // Unparseable row survives with null derived fields.
        assert!(table.records[1].parsed_timestamp.is_none());
        assert!(table.records[1].date.is_none());
        assert!(table.records[1].hour.is_none());
    }

    #[test]
    fn test_enrich_synthesized_when_no_column() {
        let mut table = table_with(&["Title"], &[&["Show A"], &["Show B"], &["Show C"]]);
        let roles = RoleAssignment {
            timestamp: None,
            duration: None,
            title: 0,
        };

        let source = enrich_timestamps(&mut table, &roles);

        assert_eq!(source, TimestampSource::Synthesized);
        assert!(table.records.iter().all(|r| r.parsed_timestamp.is_some()));
        // Distinct ordinal dates keep the temporal axis usable.
        assert_ne!(table.records[0].date, table.records[2].date);
        assert!(table.records[0].parsed_timestamp < table.records[1].parsed_timestamp);
    }
}
