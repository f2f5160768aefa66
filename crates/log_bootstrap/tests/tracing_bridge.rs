//! `tracing` events share the log file with handle events.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

use log_bootstrap::{BootstrapConfig, LogBootstrapper, fields};
use serde_json::{Map, Value, json};

#[test]
fn tracing_events_are_written_to_the_log_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = BootstrapConfig {
        console_config: None,
        filtering_directive: Some("warn,tracing_bridge=info".to_string()),
        ..BootstrapConfig::with_log_dir(tmp.path().join("logs"))
    };
    let bootstrapper = LogBootstrapper::from_config(config).unwrap();
    let logger = bootstrapper.get_logger(file!()).unwrap();
    assert_eq!(logger.name(), "tracing_bridge.rs");

    logger.info("from the handle", fields! { source = "handle" });
    tracing::info!(source = "tracing", attempt = 2_u64, "from tracing");
    tracing::info!(target: "some_dependency", "filtered by the directive");
    tracing::warn!(target: "some_dependency", "dependency warning");
    bootstrapper.flush().unwrap();

    let contents = std::fs::read_to_string(bootstrapper.log_file_path()).unwrap();
    let records: Vec<Map<String, Value>> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let events: Vec<&Value> = records.iter().map(|record| &record["event"]).collect();
    assert_eq!(
        events,
        [
            &json!("from the handle"),
            &json!("from tracing"),
            &json!("dependency warning"),
        ]
    );
    assert_eq!(records[1]["source"], json!("tracing"));
    assert_eq!(records[1]["attempt"], json!(2));
    assert_eq!(records[1]["level"], json!("info"));
    assert_eq!(records[2]["level"], json!("warning"));
}
