//! Writes a few records to `./logs/<MM_DD_YYYY_HH_MM_SS>.log` and mirrors them on stdout.

use log_bootstrap::{LogBootstrapper, LoggerError, fields};

fn main() -> Result<(), LoggerError> {
    let bootstrapper = LogBootstrapper::new()?;
    let logger = bootstrapper.logger()?;

    logger.info("custom logger initialized", ());
    logger.info(
        "User uploaded a file",
        fields! { user_id = 123, filename = "report.pdf" },
    );
    logger.error(
        "Failed to process PDF",
        fields! { error = "File not found", user_id = 123 },
    );

    let request_logger = logger.bind(fields! { request_id = "7f3a" });
    request_logger.warning("Retrying upload", fields! { attempt = 2 });

    tracing::info!(path = %bootstrapper.log_file_path().display(), "Log file ready");

    bootstrapper.flush()
}
