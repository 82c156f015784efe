//! Logging setup
//!
//! Console output by default; a daily rolling file when a log directory is
//! configured and exists. `RUST_LOG` overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("perm_check={level},perm_shared={level}")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "perm-check");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("log directory {dir} does not exist, logging to stderr");
    }

    subscriber.with_writer(std::io::stderr).init();
}
