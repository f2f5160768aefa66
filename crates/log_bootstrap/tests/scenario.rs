//! End-to-end run with the default configuration.
//!
//! The sinks are installed once per process, so this binary holds a single test.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

use log_bootstrap::{LogBootstrapper, fields};
use serde_json::{Map, Value, json};

#[test]
fn default_directory_receives_both_events_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();

    let bootstrapper = LogBootstrapper::new().unwrap();
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(bootstrapper.logs_dir(), cwd.join("logs"));
    assert!(bootstrapper.logs_dir().is_dir());

    let logger = bootstrapper.get_logger("main").unwrap();
    assert_eq!(logger.name(), "main");

    logger.info(
        "User uploaded a file",
        fields! { user_id = 123, filename = "report.pdf" },
    );
    logger.error(
        "Failed to process PDF",
        fields! { error = "File not found", user_id = 123 },
    );
    logger.debug("below the configured level", ());
    bootstrapper.flush().unwrap();

    let contents = std::fs::read_to_string(bootstrapper.log_file_path()).unwrap();
    assert!(contents.ends_with('\n'));

    let records: Vec<Map<String, Value>> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["event"], json!("User uploaded a file"));
    assert_eq!(records[0]["level"], json!("info"));
    assert_eq!(records[0]["user_id"], json!(123));
    assert_eq!(records[0]["filename"], json!("report.pdf"));

    assert_eq!(records[1]["event"], json!("Failed to process PDF"));
    assert_eq!(records[1]["level"], json!("error"));
    assert_eq!(records[1]["error"], json!("File not found"));

    // The handle name is not part of the record.
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["user_id", "filename", "timestamp", "level", "event"]);

    for record in &records {
        let timestamp = record["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
    }

    // Same name, same handle; the default name is the caller's file name.
    let again = bootstrapper.get_logger("src/main").unwrap();
    assert_eq!(again.name(), "main");
    assert_eq!(bootstrapper.logger().unwrap().name(), "scenario.rs");
}
