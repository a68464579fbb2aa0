//! Integration test for logging initialization
//!
//! The tracing subscriber can only be installed once per process, so this
//! file holds a single test exercising the full file-logging path.

use passport::config::LoggingConfig;
use passport::logging::init_logging;
use tempfile::TempDir;

#[test]
fn init_logging_writes_rotated_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = LoggingConfig {
        local_enabled: true,
        local_path: temp_dir.path().to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");

    // Explicit targets so the passport-scoped env filter keeps these events.
    tracing::info!(
        target: "passport::test",
        universal_id = "PP0123456789AB",
        "identity assigned"
    );
    tracing::warn!(
        target: "passport::test",
        user_ref = "dr-house",
        "emergency override granted"
    );

    // Dropping the guard flushes the non-blocking writer.
    drop(guard);

    let log_files: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("passport.log")
        })
        .collect();

    assert!(!log_files.is_empty(), "no rotated log file was created");

    let contents = std::fs::read_to_string(log_files[0].path()).unwrap();
    assert!(contents.contains("identity assigned"));
    assert!(contents.contains("PP0123456789AB"));
}
