//! Column-role inference.
//!
//! Each logical role (timestamp, duration, title) is resolved by an explicit
//! ordered list of named predicates evaluated in priority order; the first
//! predicate that matches wins. This keeps the heuristics deterministic
//! without relying on any implicit iteration-order guarantees.

use lens_core::models::{RoleAssignment, ViewingTable};
use lens_core::timestamps::parse_timestamp;
use tracing::debug;

/// How many leading non-missing values the content-based timestamp fallback
/// samples per column.
const TIMESTAMP_SAMPLE: usize = 5;

// ── Predicates ────────────────────────────────────────────────────────────────

/// One named heuristic: returns the matched column index, or `None`.
struct RolePredicate {
    name: &'static str,
    matcher: fn(&ViewingTable) -> Option<usize>,
}

/// First column whose name contains any of `needles`, case-insensitively,
/// scanning columns in header order.
fn match_header(table: &ViewingTable, needles: &[&str]) -> Option<usize> {
    table.headers.iter().position(|header| {
        let lower = header.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}

fn timestamp_by_name(table: &ViewingTable) -> Option<usize> {
    match_header(table, &["date"])
}

/// First column whose first few non-missing values all parse as timestamps.
/// Columns with no non-missing values at all are skipped.
fn timestamp_by_content(table: &ViewingTable) -> Option<usize> {
    (0..table.column_count()).find(|&column| {
        let sample: Vec<&str> = table
            .records
            .iter()
            .filter_map(|record| record.cell(column))
            .take(TIMESTAMP_SAMPLE)
            .collect();
        !sample.is_empty() && sample.iter().all(|value| parse_timestamp(value).is_some())
    })
}

fn duration_by_name(table: &ViewingTable) -> Option<usize> {
    match_header(table, &["duration", "minutes", "time"])
}

fn title_by_name(table: &ViewingTable) -> Option<usize> {
    match_header(table, &["title", "show", "name"])
}

/// Evaluate `predicates` in order, returning the first match.
fn resolve(table: &ViewingTable, role: &str, predicates: &[RolePredicate]) -> Option<usize> {
    for predicate in predicates {
        if let Some(column) = (predicate.matcher)(table) {
            debug!(
                "{} role -> column {:?} (via {})",
                role,
                table.header(column),
                predicate.name
            );
            return Some(column);
        }
    }
    debug!("{} role unassigned", role);
    None
}

// ── Assignment ────────────────────────────────────────────────────────────────

/// Infer the role assignment for a table, computed once and applied
/// uniformly to every record.
///
/// An unassigned timestamp or duration role is not an error: downstream
/// stages derive those fields by fallback. The title role always resolves,
/// defaulting to the first column. Roles are resolved independently, so one
/// column may legitimately serve two roles (a "Start Time" header matches
/// both the content-based timestamp sniff and the duration name scan).
pub fn assign_roles(table: &ViewingTable) -> RoleAssignment {
    let timestamp = resolve(
        table,
        "timestamp",
        &[
            RolePredicate {
                name: "header-contains-date",
                matcher: timestamp_by_name,
            },
            RolePredicate {
                name: "leading-values-parse",
                matcher: timestamp_by_content,
            },
        ],
    );

    let duration = resolve(
        table,
        "duration",
        &[RolePredicate {
            name: "header-contains-duration-minutes-time",
            matcher: duration_by_name,
        }],
    );

    let title = resolve(
        table,
        "title",
        &[RolePredicate {
            name: "header-contains-title-show-name",
            matcher: title_by_name,
        }],
    )
    .unwrap_or(0);

    RoleAssignment {
        timestamp,
        duration,
        title,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
