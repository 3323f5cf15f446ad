use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

/// Map the CLI's log-level names to tracing directives (tracing uses
/// lowercase and calls WARNING "warn"). The set mirrors the values the
/// settings parser admits; anything else passes through for `EnvFilter`
/// to reject.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

// ── Output-directory bootstrap ─────────────────────────────────────────────────

/// Ensure the artifact directory exists, including any missing parents.
pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive_covers_admitted_values() {
        // Exactly the values the settings parser admits.
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
    }

    #[test]
    fn test_level_directive_passes_unknown_through() {
        assert_eq!(level_directive("trace"), "trace");
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let tmp = TempDir::new().expect("tempdir");
        let target = tmp.path().join("reports").join("run-1");

        ensure_output_dir(&target).expect("ensure_output_dir should succeed");

        assert!(target.is_dir(), "nested output dir must exist");
    }

    #[test]
    fn test_ensure_output_dir_idempotent() {
        let tmp = TempDir::new().expect("tempdir");

        ensure_output_dir(tmp.path()).expect("first call");
        ensure_output_dir(tmp.path()).expect("second call");

        assert!(tmp.path().is_dir());
    }
}
