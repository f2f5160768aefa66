//! `log` crate records are written through the `tracing` bridge.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

use log_bootstrap::{BootstrapConfig, LogBootstrapper};
use serde_json::{Map, Value, json};

#[test]
fn log_records_are_written_without_bookkeeping_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let config = BootstrapConfig {
        console_config: None,
        ..BootstrapConfig::with_log_dir(tmp.path().join("logs"))
    };
    let bootstrapper = LogBootstrapper::from_config(config).unwrap();
    let _logger = bootstrapper.get_logger("main").unwrap();

    log::info!(target: "legacy", "from log crate");
    log::warn!(target: "legacy", "retrying in {} seconds", 5);
    log::debug!(target: "legacy", "below the minimum level");
    bootstrapper.flush().unwrap();

    let contents = std::fs::read_to_string(bootstrapper.log_file_path()).unwrap();
    let records: Vec<Map<String, Value>> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["event"], json!("from log crate"));
    assert_eq!(records[0]["level"], json!("info"));
    assert_eq!(records[1]["event"], json!("retrying in 5 seconds"));
    assert_eq!(records[1]["level"], json!("warning"));

    for record in &records {
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["timestamp", "level", "event"]);
    }
}
