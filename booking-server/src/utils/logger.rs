//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level when it is set.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with console output only
pub fn init_logger(log_level: &str) {
    init_logger_with_file(log_level, None);
}

/// Initialize the logger with optional daily rolling file output
///
/// The file is only used when `log_dir` already exists; otherwise logs go to stdout.
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},booking_server={log_level}")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        if Path::new(dir).is_dir() {
            let file_appender = tracing_appender::rolling::daily(dir, "booking-server");
            // 文件里不要颜色控制符
            let _ = subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .try_init();
            return;
        }
        eprintln!("Log dir {dir} does not exist, logging to stdout");
    }

    let _ = subscriber.try_init();
}
