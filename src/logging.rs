//! Logging bootstrap
//!
//! Logs go to stderr by default, or to rotating files when a directory is
//! configured. `RUST_LOG` overrides the configured level.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::info;

use crate::config::Config;

const LOG_FILE_BASENAME: &str = "habit-tracker";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the logger. The returned handle must stay alive for the whole run.
pub fn init_logging(config: &Config) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&config.logging.level)
        .with_context(|| format!("Invalid log level '{}'", config.logging.level))?;

    let logger = match config.log_directory() {
        Some(dir) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .append()
            .format_for_files(flexi_logger::detailed_format),
        None => logger.log_to_stderr(),
    };

    let handle = logger.start().context("Failed to start logger")?;
    info!(
        "event=app_start module=logging status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}
